//! 成本中心命令处理器

use std::sync::Arc;

use pms_errors::{AppError, AppResult};
use tracing::{info, warn};

use super::commands::*;
use crate::domain::entities::CostCenter;
use crate::domain::repositories::{CostCenterRepository, RepositoryError};
use crate::domain::services::would_create_cycle;
use crate::infrastructure::observability::record_operation;

/// 成本中心命令处理器
///
/// 每个操作按顺序访问存储，任一校验失败都不会产生写入。
/// 校验与写入之间没有加锁，唯一性最终由数据库约束保证。
pub struct CostCenterCommandHandler<R>
where
    R: CostCenterRepository,
{
    repo: Arc<R>,
}

impl<R> CostCenterCommandHandler<R>
where
    R: CostCenterRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 创建成本中心
    pub async fn handle_create(&self, cmd: CreateCostCenterCommand) -> AppResult<CostCenter> {
        let result = self.create(cmd).await;
        record_operation("create", &result);
        result
    }

    /// 更新成本中心
    pub async fn handle_update(&self, cmd: UpdateCostCenterCommand) -> AppResult<CostCenter> {
        let result = self.update(cmd).await;
        record_operation("update", &result);
        result
    }

    /// 删除成本中心
    pub async fn handle_delete(&self, cmd: DeleteCostCenterCommand) -> AppResult<()> {
        let result = self.delete(cmd).await;
        record_operation("delete", &result);
        result
    }

    async fn create(&self, cmd: CreateCostCenterCommand) -> AppResult<CostCenter> {
        if let Some(parent_id) = cmd.parent_id
            && !self.repo.exists(parent_id).await?
        {
            warn!(%parent_id, "Create rejected: parent does not exist");
            return Err(AppError::not_found(format!(
                "Parent cost center {parent_id} does not exist"
            )));
        }

        if let Some(code) = cmd.code.as_deref()
            && self.repo.exists_by_code(code, None).await?
        {
            warn!(code, "Create rejected: duplicate code");
            return Err(AppError::conflict(format!(
                "A cost center with code '{code}' already exists"
            )));
        }

        let center = self.repo.insert(&cmd.into_new_cost_center()).await?;

        info!(id = %center.id(), name = center.name(), "Cost center created");
        Ok(center)
    }

    async fn update(&self, cmd: UpdateCostCenterCommand) -> AppResult<CostCenter> {
        if let Some(parent_id) = cmd.parent_id {
            if !self.repo.exists(parent_id).await? {
                warn!(id = %cmd.id, %parent_id, "Update rejected: parent does not exist");
                return Err(AppError::not_found(format!(
                    "Parent cost center {parent_id} does not exist"
                )));
            }
            if would_create_cycle(self.repo.as_ref(), cmd.id, parent_id).await? {
                warn!(id = %cmd.id, %parent_id, "Update rejected: hierarchy cycle");
                return Err(AppError::hierarchy_cycle(format!(
                    "Assigning parent {parent_id} to cost center {} would create a hierarchy cycle",
                    cmd.id
                )));
            }
        }

        if let Some(code) = cmd.code.as_deref()
            && self.repo.exists_by_code(code, Some(cmd.id)).await?
        {
            warn!(id = %cmd.id, code, "Update rejected: duplicate code");
            return Err(AppError::conflict(format!(
                "Another cost center already uses code '{code}'"
            )));
        }

        let center = self.repo.update(cmd.id, &cmd.changes()).await?;

        info!(id = %center.id(), is_active = center.is_active(), "Cost center updated");
        Ok(center)
    }

    async fn delete(&self, cmd: DeleteCostCenterCommand) -> AppResult<()> {
        let children = self.repo.count_children(cmd.id).await?;
        if children > 0 {
            warn!(id = %cmd.id, children, "Delete rejected: cost center has children");
            return Err(AppError::referential_integrity(
                "Cannot delete a cost center that has child cost centers. \
                 Reassign or delete the child cost centers first.",
            ));
        }

        let products = self.repo.count_products(cmd.id).await?;
        if products > 0 {
            warn!(id = %cmd.id, products, "Delete rejected: cost center has products");
            return Err(AppError::referential_integrity(format!(
                "Cannot delete the cost center because it has {products} associated products"
            )));
        }

        self.repo.delete(cmd.id).await.map_err(|e| match e {
            // 检查之后又出现了引用
            RepositoryError::ForeignKeyViolation => AppError::referential_integrity(
                "Cost center is still referenced by other records",
            ),
            other => other.into(),
        })?;

        info!(id = %cmd.id, "Cost center deleted");
        Ok(())
    }
}
