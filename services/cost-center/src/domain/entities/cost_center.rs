//! 成本中心实体

use pms_common::types::AuditInfo;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::CostCenterId;

/// 成本中心实体
///
/// 可选的父级构成层级结构，父级链上不允许出现环
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    id: CostCenterId,
    name: String,
    /// 可选编码，存在时全局唯一
    code: Option<String>,
    description: Option<String>,
    /// 父级 ID，None 表示根节点
    parent_id: Option<CostCenterId>,
    is_active: bool,
    audit_info: AuditInfo,
}

impl CostCenter {
    /// 创建启用状态的根级成本中心
    pub fn new(id: CostCenterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            description: None,
            parent_id: None,
            is_active: true,
            audit_info: AuditInfo::default(),
        }
    }

    // ========== Builders ==========

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_parent(mut self, parent_id: Option<CostCenterId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_audit_info(mut self, audit_info: AuditInfo) -> Self {
        self.audit_info = audit_info;
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> CostCenterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parent_id(&self) -> Option<CostCenterId> {
        self.parent_id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    /// 应用更新内容（存储层在更新成功后用于回填）
    pub fn apply_changes(&mut self, changes: &CostCenterChanges) {
        self.name = changes.name.clone();
        self.description = changes.description.clone();
        self.code = changes.code.clone();
        self.parent_id = changes.parent_id;
        self.is_active = changes.is_active;
        self.audit_info.touch();
    }
}

/// 新建成本中心的写入内容
///
/// 字段已完成裁剪和空值归一化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCostCenter {
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<CostCenterId>,
}

/// 更新成本中心的写入内容（整行覆盖）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostCenterChanges {
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<CostCenterId>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_active_root() {
        let center = CostCenter::new(CostCenterId(1), "Operaciones");
        assert!(center.is_active());
        assert!(center.is_root());
        assert_eq!(center.code(), None);
    }

    #[test]
    fn test_apply_changes() {
        let mut center = CostCenter::new(CostCenterId(2), "Cocina")
            .with_code(Some("CC-002".to_string()))
            .with_parent(Some(CostCenterId(1)));

        center.apply_changes(&CostCenterChanges {
            name: "Cocina Central".to_string(),
            description: Some("Producción".to_string()),
            code: None,
            parent_id: None,
            is_active: false,
        });

        assert_eq!(center.name(), "Cocina Central");
        assert_eq!(center.description(), Some("Producción"));
        assert_eq!(center.code(), None);
        assert!(center.is_root());
        assert!(!center.is_active());
    }
}
