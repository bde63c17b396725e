//! 查询视图
//!
//! 列表、选择器和树形展示使用的只读结构

use serde::Serialize;

use super::CostCenter;
use crate::domain::value_objects::CostCenterId;

/// 父级摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentSummary {
    pub id: CostCenterId,
    pub name: String,
    pub code: Option<String>,
}

impl From<&CostCenter> for ParentSummary {
    fn from(center: &CostCenter) -> Self {
        Self {
            id: center.id(),
            name: center.name().to_string(),
            code: center.code().map(str::to_string),
        }
    }
}

/// 直接子级摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildSummary {
    pub id: CostCenterId,
    pub name: String,
}

/// 关联计数
///
/// 销售和权限尚未与成本中心建立关联，固定为 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CostCenterCounts {
    pub products: u64,
    pub children: u64,
    pub sales: u64,
    pub permissions: u64,
}

impl CostCenterCounts {
    pub fn new(products: u64, children: u64) -> Self {
        Self {
            products,
            children,
            ..Default::default()
        }
    }
}

/// 分页列表中的一行
#[derive(Debug, Clone, Serialize)]
pub struct CostCenterListItem {
    pub cost_center: CostCenter,
    pub parent: Option<ParentSummary>,
    pub children: Vec<ChildSummary>,
    pub counts: CostCenterCounts,
}

impl CostCenterListItem {
    /// 子级数量由子级列表推导
    pub fn new(
        cost_center: CostCenter,
        parent: Option<ParentSummary>,
        children: Vec<ChildSummary>,
        product_count: u64,
    ) -> Self {
        let counts = CostCenterCounts::new(product_count, children.len() as u64);
        Self {
            cost_center,
            parent,
            children,
            counts,
        }
    }
}

/// 单个成本中心详情
#[derive(Debug, Clone, Serialize)]
pub struct CostCenterDetail {
    pub cost_center: CostCenter,
    pub parent: Option<ParentSummary>,
}

/// 下拉选择用的精简结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostCenterOption {
    pub id: CostCenterId,
    pub name: String,
    pub code: Option<String>,
    pub parent_id: Option<CostCenterId>,
}

impl From<&CostCenter> for CostCenterOption {
    fn from(center: &CostCenter) -> Self {
        Self {
            id: center.id(),
            name: center.name().to_string(),
            code: center.code().map(str::to_string),
            parent_id: center.parent_id(),
        }
    }
}

/// 选择器过滤条件
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostCenterFilter {
    /// 排除的 ID（编辑时排除自身）
    pub exclude_id: Option<CostCenterId>,
    pub active_only: bool,
}

impl CostCenterFilter {
    pub fn matches(&self, center: &CostCenter) -> bool {
        self.exclude_id != Some(center.id()) && (!self.active_only || center.is_active())
    }
}

/// 树节点
#[derive(Debug, Clone, Serialize)]
pub struct CostCenterNode {
    pub cost_center: CostCenter,
    pub children: Vec<CostCenterNode>,
}

impl CostCenterNode {
    /// 子树中的节点总数（含自身）
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CostCenterNode::size).sum::<usize>()
    }
}
