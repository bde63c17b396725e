//! 成本中心查询处理器

use std::sync::Arc;

use pms_common::types::PagedResult;
use pms_errors::{AppError, AppResult};
use tracing::debug;

use super::queries::*;
use crate::domain::entities::{
    CostCenter, CostCenterDetail, CostCenterFilter, CostCenterListItem, CostCenterNode,
    CostCenterOption, ParentSummary,
};
use crate::domain::repositories::CostCenterRepository;
use crate::domain::services::build_tree;
use crate::infrastructure::observability::record_operation;

/// 成本中心查询处理器
pub struct CostCenterQueryHandler<R>
where
    R: CostCenterRepository,
{
    repo: Arc<R>,
}

impl<R> CostCenterQueryHandler<R>
where
    R: CostCenterRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 分页列表，按名称升序
    pub async fn handle_list(
        &self,
        query: ListCostCentersQuery,
    ) -> AppResult<PagedResult<CostCenterListItem>> {
        let pagination = query.pagination();
        let result = self.repo.list_page(pagination).await.map_err(AppError::from);
        record_operation("list", &result);

        let page = result?;
        debug!(
            page = page.page,
            page_size = page.page_size,
            total = page.total,
            "Cost centers listed"
        );
        Ok(page)
    }

    /// 单个成本中心及其父级
    pub async fn handle_get(&self, query: GetCostCenterQuery) -> AppResult<CostCenterDetail> {
        let result = self.get(query).await;
        record_operation("get", &result);
        result
    }

    /// 父级候选（编辑表单的下拉框）
    pub async fn handle_parent_candidates(
        &self,
        query: ListParentCandidatesQuery,
    ) -> AppResult<Vec<CostCenterOption>> {
        let filter = CostCenterFilter {
            exclude_id: query.exclude_id,
            active_only: false,
        };
        Ok(self.repo.list_options(filter).await?)
    }

    /// 启用状态的成本中心
    pub async fn handle_active(&self) -> AppResult<Vec<CostCenterOption>> {
        let filter = CostCenterFilter {
            exclude_id: None,
            active_only: true,
        };
        Ok(self.repo.list_options(filter).await?)
    }

    /// 全部成本中心
    pub async fn handle_all(&self) -> AppResult<Vec<CostCenter>> {
        Ok(self.repo.list_all().await?)
    }

    /// 层级树
    pub async fn handle_tree(&self) -> AppResult<Vec<CostCenterNode>> {
        let centers = self.repo.list_all().await?;
        Ok(build_tree(centers))
    }

    async fn get(&self, query: GetCostCenterQuery) -> AppResult<CostCenterDetail> {
        let center = self
            .repo
            .find_by_id(query.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Cost center {} not found", query.id)))?;

        let parent = match center.parent_id() {
            Some(parent_id) => self
                .repo
                .find_by_id(parent_id)
                .await?
                .as_ref()
                .map(ParentSummary::from),
            None => None,
        };

        Ok(CostCenterDetail {
            cost_center: center,
            parent,
        })
    }
}
