//! 成本中心命令定义
//!
//! 表单字段在这里完成裁剪、空值归一化和格式校验，
//! 依赖存储的校验（父级存在、环、编码唯一）由命令处理器完成

use pms_errors::{AppError, AppResult};

use crate::domain::entities::{CostCenterChanges, NewCostCenter};
use crate::domain::value_objects::CostCenterId;

const PARENT_ID_FIELD: &str = "parent cost center id";
const ID_FIELD: &str = "cost center id";

/// 表单原始字段
#[derive(Debug, Clone, Default)]
pub struct CostCenterFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<String>,
}

/// 裁剪后为空的字段视为未提供
fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required_name(raw: Option<&str>) -> AppResult<String> {
    non_blank(raw).ok_or_else(|| AppError::validation("Cost center name is required"))
}

/// 创建成本中心命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCostCenterCommand {
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<CostCenterId>,
}

impl CreateCostCenterCommand {
    /// 从表单字段构造：先校验名称，再解析父级 ID
    pub fn parse(fields: &CostCenterFields) -> AppResult<Self> {
        let name = required_name(fields.name.as_deref())?;
        let parent_id = CostCenterId::parse_optional(fields.parent_id.as_deref(), PARENT_ID_FIELD)?;

        Ok(Self {
            name,
            description: non_blank(fields.description.as_deref()),
            code: non_blank(fields.code.as_deref()),
            parent_id,
        })
    }

    pub fn into_new_cost_center(self) -> NewCostCenter {
        NewCostCenter {
            name: self.name,
            description: self.description,
            code: self.code,
            parent_id: self.parent_id,
        }
    }
}

/// 更新成本中心命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCostCenterCommand {
    pub id: CostCenterId,
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<CostCenterId>,
    pub is_active: bool,
}

impl UpdateCostCenterCommand {
    /// 从表单字段构造
    ///
    /// `is_active` 只有原始值为 `"true"` 时为 true，缺省或其他值都视为停用
    pub fn parse(
        id: CostCenterId,
        fields: &CostCenterFields,
        is_active: Option<&str>,
    ) -> AppResult<Self> {
        let name = required_name(fields.name.as_deref())?;
        let parent_id = CostCenterId::parse_optional(fields.parent_id.as_deref(), PARENT_ID_FIELD)?;
        if parent_id == Some(id) {
            return Err(AppError::validation(
                "A cost center cannot be its own parent",
            ));
        }

        Ok(Self {
            id,
            name,
            description: non_blank(fields.description.as_deref()),
            code: non_blank(fields.code.as_deref()),
            parent_id,
            is_active: is_active == Some("true"),
        })
    }

    pub fn changes(&self) -> CostCenterChanges {
        CostCenterChanges {
            name: self.name.clone(),
            description: self.description.clone(),
            code: self.code.clone(),
            parent_id: self.parent_id,
            is_active: self.is_active,
        }
    }
}

/// 删除成本中心命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCostCenterCommand {
    pub id: CostCenterId,
}

impl DeleteCostCenterCommand {
    pub fn parse(raw_id: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            id: CostCenterId::parse_required(raw_id, ID_FIELD)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, code: &str, parent_id: &str) -> CostCenterFields {
        CostCenterFields {
            name: Some(name.to_string()),
            description: Some("  ".to_string()),
            code: Some(code.to_string()),
            parent_id: Some(parent_id.to_string()),
        }
    }

    #[test]
    fn test_create_trims_and_normalizes() {
        let cmd = CreateCostCenterCommand::parse(&fields("  Cocina ", " CC-002 ", "")).unwrap();
        assert_eq!(cmd.name, "Cocina");
        assert_eq!(cmd.code.as_deref(), Some("CC-002"));
        assert_eq!(cmd.description, None);
        assert_eq!(cmd.parent_id, None);
    }

    #[test]
    fn test_create_requires_name_before_parsing_parent() {
        let err = CreateCostCenterCommand::parse(&fields("   ", "", "abc")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("name")));
    }

    #[test]
    fn test_create_rejects_non_numeric_parent() {
        let err = CreateCostCenterCommand::parse(&fields("Cocina", "", "abc")).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("parent")));
    }

    #[test]
    fn test_update_rejects_self_parent() {
        let err = UpdateCostCenterCommand::parse(
            CostCenterId(3),
            &fields("Spa", "", "3"),
            Some("true"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("own parent")));
    }

    #[test]
    fn test_update_active_flag() {
        let active =
            UpdateCostCenterCommand::parse(CostCenterId(3), &fields("Spa", "", "1"), Some("true"))
                .unwrap();
        assert!(active.is_active);
        assert_eq!(active.parent_id, Some(CostCenterId(1)));

        let inactive =
            UpdateCostCenterCommand::parse(CostCenterId(3), &fields("Spa", "", ""), Some("on"))
                .unwrap();
        assert!(!inactive.is_active);

        let missing =
            UpdateCostCenterCommand::parse(CostCenterId(3), &fields("Spa", "", ""), None).unwrap();
        assert!(!missing.is_active);
    }

    #[test]
    fn test_delete_parses_id() {
        assert_eq!(
            DeleteCostCenterCommand::parse(Some("4")).unwrap().id,
            CostCenterId(4)
        );
        assert!(DeleteCostCenterCommand::parse(Some("x")).is_err());
        assert!(DeleteCostCenterCommand::parse(Some("0")).is_err());
        assert!(DeleteCostCenterCommand::parse(None).is_err());
    }
}
