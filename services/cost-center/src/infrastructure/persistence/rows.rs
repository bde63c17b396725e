//! 数据库行结构与实体转换

use chrono::{DateTime, Utc};
use pms_common::types::AuditInfo;
use serde::Deserialize;
use sqlx::FromRow;
use sqlx::types::Json;

use crate::domain::entities::{
    ChildSummary, CostCenter, CostCenterListItem, CostCenterOption, ParentSummary,
};
use crate::domain::value_objects::CostCenterId;

/// 查询列：与 `CostCenterRow` 字段一一对应
pub(crate) const COST_CENTER_COLUMNS: &str =
    "id, name, code, description, parent_id, is_active, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct CostCenterRow {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CostCenterRow> for CostCenter {
    fn from(row: CostCenterRow) -> Self {
        CostCenter::new(CostCenterId(row.id), row.name)
            .with_code(row.code)
            .with_description(row.description)
            .with_parent(row.parent_id.map(CostCenterId))
            .with_active(row.is_active)
            .with_audit_info(AuditInfo::new(row.created_at, row.updated_at))
    }
}

/// 分页列表行：成本中心 + 父级摘要 + 子级 JSON + 产品计数
#[derive(Debug, FromRow)]
pub(crate) struct CostCenterListRow {
    #[sqlx(flatten)]
    pub center: CostCenterRow,
    pub parent_name: Option<String>,
    pub parent_code: Option<String>,
    pub children: Json<Vec<ChildRow>>,
    pub product_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChildRow {
    pub id: i64,
    pub name: String,
}

impl From<CostCenterListRow> for CostCenterListItem {
    fn from(row: CostCenterListRow) -> Self {
        // LEFT JOIN 未命中时 parent_name 为空
        let parent = match (row.center.parent_id, row.parent_name) {
            (Some(id), Some(name)) => Some(ParentSummary {
                id: CostCenterId(id),
                name,
                code: row.parent_code,
            }),
            _ => None,
        };
        let children = row
            .children
            .0
            .into_iter()
            .map(|child| ChildSummary {
                id: CostCenterId(child.id),
                name: child.name,
            })
            .collect();
        let product_count = u64::try_from(row.product_count).unwrap_or_default();

        CostCenterListItem::new(row.center.into(), parent, children, product_count)
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CostCenterOptionRow {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
    pub parent_id: Option<i64>,
}

impl From<CostCenterOptionRow> for CostCenterOption {
    fn from(row: CostCenterOptionRow) -> Self {
        Self {
            id: CostCenterId(row.id),
            name: row.name,
            code: row.code,
            parent_id: row.parent_id.map(CostCenterId),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, name: &str, parent_id: Option<i64>) -> CostCenterRow {
        let now = Utc::now();
        CostCenterRow {
            id,
            name: name.to_string(),
            code: Some(format!("CC-{id:03}")),
            description: None,
            parent_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_to_entity() {
        let center: CostCenter = row(2, "Cocina", Some(1)).into();
        assert_eq!(center.id(), CostCenterId(2));
        assert_eq!(center.code(), Some("CC-002"));
        assert_eq!(center.parent_id(), Some(CostCenterId(1)));
    }

    #[test]
    fn test_list_row_to_item() {
        let item: CostCenterListItem = CostCenterListRow {
            center: row(1, "Operaciones", None),
            parent_name: None,
            parent_code: None,
            children: Json(vec![
                ChildRow { id: 2, name: "Cocina".to_string() },
                ChildRow { id: 3, name: "Spa".to_string() },
            ]),
            product_count: 3,
        }
        .into();

        assert!(item.parent.is_none());
        assert_eq!(item.children.len(), 2);
        assert_eq!(item.counts.children, 2);
        assert_eq!(item.counts.products, 3);
    }

    #[test]
    fn test_list_row_with_parent() {
        let item: CostCenterListItem = CostCenterListRow {
            center: row(2, "Cocina", Some(1)),
            parent_name: Some("Operaciones".to_string()),
            parent_code: Some("CC-001".to_string()),
            children: Json(Vec::new()),
            product_count: 0,
        }
        .into();

        let parent = item.parent.unwrap();
        assert_eq!(parent.id, CostCenterId(1));
        assert_eq!(parent.name, "Operaciones");
        assert_eq!(parent.code.as_deref(), Some("CC-001"));
    }
}
