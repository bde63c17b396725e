//! JSON 响应结构

use chrono::{DateTime, Utc};
use pms_common::types::PagedResult;
use serde::Serialize;

use crate::domain::entities::{
    ChildSummary, CostCenter, CostCenterCounts, CostCenterDetail, CostCenterListItem,
    CostCenterNode, CostCenterOption, ParentSummary,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CostCenter> for CostCenterResponse {
    fn from(center: &CostCenter) -> Self {
        Self {
            id: center.id().value(),
            name: center.name().to_string(),
            code: center.code().map(str::to_string),
            description: center.description().map(str::to_string),
            parent_id: center.parent_id().map(|id| id.value()),
            is_active: center.is_active(),
            created_at: center.audit_info().created_at,
            updated_at: center.audit_info().updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ParentResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

impl From<ParentSummary> for ParentResponse {
    fn from(parent: ParentSummary) -> Self {
        Self {
            id: parent.id.value(),
            name: parent.name,
            code: parent.code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChildResponse {
    pub id: i64,
    pub name: String,
}

impl From<ChildSummary> for ChildResponse {
    fn from(child: ChildSummary) -> Self {
        Self {
            id: child.id.value(),
            name: child.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub products: u64,
    pub children: u64,
    pub sales: u64,
    pub permissions: u64,
}

impl From<CostCenterCounts> for CountsResponse {
    fn from(counts: CostCenterCounts) -> Self {
        Self {
            products: counts.products,
            children: counts.children,
            sales: counts.sales,
            permissions: counts.permissions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CostCenterListItemResponse {
    #[serde(flatten)]
    pub cost_center: CostCenterResponse,
    pub parent: Option<ParentResponse>,
    pub children: Vec<ChildResponse>,
    pub counts: CountsResponse,
}

impl From<CostCenterListItem> for CostCenterListItemResponse {
    fn from(item: CostCenterListItem) -> Self {
        Self {
            cost_center: (&item.cost_center).into(),
            parent: item.parent.map(Into::into),
            children: item.children.into_iter().map(Into::into).collect(),
            counts: item.counts.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterPageResponse {
    pub cost_centers: Vec<CostCenterListItemResponse>,
    pub total_count: u64,
    pub total_pages: u32,
    pub page: u32,
    pub page_size: u32,
}

impl From<PagedResult<CostCenterListItem>> for CostCenterPageResponse {
    fn from(result: PagedResult<CostCenterListItem>) -> Self {
        let total_pages = result.total_pages();
        let result = result.map(CostCenterListItemResponse::from);
        Self {
            cost_centers: result.items,
            total_count: result.total,
            total_pages,
            page: result.page,
            page_size: result.page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CostCenterDetailResponse {
    #[serde(flatten)]
    pub cost_center: CostCenterResponse,
    pub parent: Option<ParentResponse>,
}

impl From<CostCenterDetail> for CostCenterDetailResponse {
    fn from(detail: CostCenterDetail) -> Self {
        Self {
            cost_center: (&detail.cost_center).into(),
            parent: detail.parent.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterOptionResponse {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub parent_id: Option<i64>,
}

impl From<CostCenterOption> for CostCenterOptionResponse {
    fn from(option: CostCenterOption) -> Self {
        Self {
            id: option.id.value(),
            name: option.name,
            code: option.code,
            parent_id: option.parent_id.map(|id| id.value()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CostCenterNodeResponse {
    #[serde(flatten)]
    pub cost_center: CostCenterResponse,
    pub children: Vec<CostCenterNodeResponse>,
}

impl From<CostCenterNode> for CostCenterNodeResponse {
    fn from(node: CostCenterNode) -> Self {
        Self {
            cost_center: (&node.cost_center).into(),
            children: node.children.into_iter().map(Into::into).collect(),
        }
    }
}
