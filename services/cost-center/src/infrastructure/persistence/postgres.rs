//! PostgreSQL 成本中心仓储实现

use async_trait::async_trait;
use pms_adapter_postgres::{DbErrorKind, classify_error};
use pms_common::types::{PagedResult, Pagination};
use sqlx::PgPool;
use tracing::{debug, error};

use super::rows::{COST_CENTER_COLUMNS, CostCenterListRow, CostCenterOptionRow, CostCenterRow};
use crate::domain::entities::{
    CostCenter, CostCenterChanges, CostCenterFilter, CostCenterListItem, CostCenterOption,
    NewCostCenter,
};
use crate::domain::repositories::{
    CostCenterRepository, RepositoryError, RepositoryResult, UniqueField,
};
use crate::domain::value_objects::CostCenterId;

/// 名称唯一约束
const NAME_CONSTRAINT: &str = "cost_centers_name_key";
/// 编码唯一约束
const CODE_CONSTRAINT: &str = "cost_centers_code_key";

/// 把 sqlx 错误归类为仓储错误
fn map_sqlx_error(operation: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| match classify_error(&e) {
        DbErrorKind::UniqueViolation { constraint } => match constraint.as_deref() {
            Some(NAME_CONSTRAINT) => RepositoryError::UniqueViolation {
                field: UniqueField::Name,
            },
            Some(CODE_CONSTRAINT) => RepositoryError::UniqueViolation {
                field: UniqueField::Code,
            },
            _ => RepositoryError::database(operation, e.to_string()),
        },
        DbErrorKind::ForeignKeyViolation { .. } => RepositoryError::ForeignKeyViolation,
        DbErrorKind::RowNotFound => RepositoryError::NotFound,
        DbErrorKind::Other => {
            error!(operation, error = %e, "Cost center query failed");
            RepositoryError::database(operation, e.to_string())
        }
    }
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

pub struct PostgresCostCenterRepository {
    pool: PgPool,
}

impl PostgresCostCenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CostCenterRepository for PostgresCostCenterRepository {
    async fn find_by_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenter>> {
        let row = sqlx::query_as::<_, CostCenterRow>(&format!(
            "SELECT {COST_CENTER_COLUMNS} FROM cost_centers WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error("loading cost center"))?;

        Ok(row.map(Into::into))
    }

    async fn find_parent_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenterId>> {
        let parent: Option<Option<i64>> =
            sqlx::query_scalar("SELECT parent_id FROM cost_centers WHERE id = $1")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error("checking hierarchy cycle"))?;

        Ok(parent.flatten().map(CostCenterId))
    }

    async fn exists(&self, id: CostCenterId) -> RepositoryResult<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cost_centers WHERE id = $1)")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error("checking parent"))
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<CostCenterId>,
    ) -> RepositoryResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM cost_centers
                WHERE code = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(code)
        .bind(exclude_id.map(|id| id.0))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error("checking code"))
    }

    async fn insert(&self, new: &NewCostCenter) -> RepositoryResult<CostCenter> {
        let row = sqlx::query_as::<_, CostCenterRow>(&format!(
            r#"
            INSERT INTO cost_centers (name, description, code, parent_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COST_CENTER_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.code)
        .bind(new.parent_id.map(|id| id.0))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error("creating cost center"))?;

        debug!(id = row.id, "Cost center row inserted");
        Ok(row.into())
    }

    async fn update(
        &self,
        id: CostCenterId,
        changes: &CostCenterChanges,
    ) -> RepositoryResult<CostCenter> {
        let row = sqlx::query_as::<_, CostCenterRow>(&format!(
            r#"
            UPDATE cost_centers
            SET name = $2, description = $3, code = $4, parent_id = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {COST_CENTER_COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(&changes.code)
        .bind(changes.parent_id.map(|id| id.0))
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error("updating cost center"))?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: CostCenterId) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM cost_centers WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error("deleting cost center"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn count_children(&self, id: CostCenterId) -> RepositoryResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM cost_centers WHERE parent_id = $1")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error("checking children"))?;

        Ok(to_count(count))
    }

    async fn count_products(&self, id: CostCenterId) -> RepositoryResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE default_cost_center_id = $1")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error("checking products"))?;

        Ok(to_count(count))
    }

    async fn list_page(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<PagedResult<CostCenterListItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cost_centers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error("listing cost centers"))?;

        let rows = sqlx::query_as::<_, CostCenterListRow>(
            r#"
            SELECT c.id, c.name, c.code, c.description, c.parent_id, c.is_active,
                   c.created_at, c.updated_at,
                   p.name AS parent_name,
                   p.code AS parent_code,
                   COALESCE(
                       (SELECT json_agg(json_build_object('id', ch.id, 'name', ch.name)
                                        ORDER BY ch.name, ch.id)
                        FROM cost_centers ch
                        WHERE ch.parent_id = c.id),
                       '[]'::json
                   ) AS children,
                   (SELECT COUNT(*) FROM products pr
                    WHERE pr.default_cost_center_id = c.id) AS product_count
            FROM cost_centers c
            LEFT JOIN cost_centers p ON p.id = c.parent_id
            ORDER BY c.name ASC, c.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(pagination.limit()))
        .bind(i64::from(pagination.offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error("listing cost centers"))?;

        let items = rows.into_iter().map(Into::into).collect();
        Ok(PagedResult::new(items, to_count(total), &pagination))
    }

    async fn list_options(
        &self,
        filter: CostCenterFilter,
    ) -> RepositoryResult<Vec<CostCenterOption>> {
        let rows = sqlx::query_as::<_, CostCenterOptionRow>(
            r#"
            SELECT id, name, code, parent_id
            FROM cost_centers
            WHERE ($1::BIGINT IS NULL OR id <> $1)
              AND (NOT $2 OR is_active)
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(filter.exclude_id.map(|id| id.0))
        .bind(filter.active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error("listing cost center options"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<CostCenter>> {
        let rows = sqlx::query_as::<_, CostCenterRow>(&format!(
            "SELECT {COST_CENTER_COLUMNS} FROM cost_centers ORDER BY name ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error("listing all cost centers"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
