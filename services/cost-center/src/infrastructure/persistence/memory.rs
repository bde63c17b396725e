//! 内存成本中心仓储
//!
//! 模拟数据库的唯一约束和外键约束，用于测试和本地开发

use std::collections::BTreeMap;

use async_trait::async_trait;
use pms_common::types::{AuditInfo, PagedResult, Pagination};
use tokio::sync::RwLock;

use crate::domain::entities::{
    ChildSummary, CostCenter, CostCenterChanges, CostCenterFilter, CostCenterListItem,
    CostCenterOption, NewCostCenter, ParentSummary,
};
use crate::domain::repositories::{
    CostCenterRepository, RepositoryError, RepositoryResult, UniqueField,
};
use crate::domain::value_objects::CostCenterId;

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    centers: BTreeMap<CostCenterId, CostCenter>,
    /// product id -> 默认成本中心
    products: BTreeMap<i64, Option<CostCenterId>>,
    next_product_id: i64,
}

impl State {
    fn check_unique(
        &self,
        name: &str,
        code: Option<&str>,
        exclude: Option<CostCenterId>,
    ) -> RepositoryResult<()> {
        let others = self
            .centers
            .values()
            .filter(|center| Some(center.id()) != exclude);
        for center in others {
            if center.name() == name {
                return Err(RepositoryError::UniqueViolation {
                    field: UniqueField::Name,
                });
            }
            if code.is_some() && center.code() == code {
                return Err(RepositoryError::UniqueViolation {
                    field: UniqueField::Code,
                });
            }
        }
        Ok(())
    }

    fn check_parent(&self, parent_id: Option<CostCenterId>) -> RepositoryResult<()> {
        match parent_id {
            Some(parent) if !self.centers.contains_key(&parent) => {
                Err(RepositoryError::ForeignKeyViolation)
            }
            _ => Ok(()),
        }
    }

    fn children_of(&self, id: CostCenterId) -> impl Iterator<Item = &CostCenter> {
        self.centers
            .values()
            .filter(move |center| center.parent_id() == Some(id))
    }

    fn product_count(&self, id: CostCenterId) -> u64 {
        self.products
            .values()
            .filter(|default| **default == Some(id))
            .count() as u64
    }

    fn sorted_by_name(&self) -> Vec<&CostCenter> {
        let mut centers: Vec<&CostCenter> = self.centers.values().collect();
        centers.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        centers
    }
}

/// 内存仓储
#[derive(Debug, Default)]
pub struct InMemoryCostCenterRepository {
    state: RwLock<State>,
}

impl InMemoryCostCenterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个产品，返回产品 ID
    pub async fn add_product(&self, default_cost_center: Option<CostCenterId>) -> i64 {
        let mut state = self.state.write().await;
        state.next_product_id += 1;
        let id = state.next_product_id;
        state.products.insert(id, default_cost_center);
        id
    }

    /// 修改产品的默认成本中心
    pub async fn set_product_cost_center(
        &self,
        product_id: i64,
        default_cost_center: Option<CostCenterId>,
    ) {
        let mut state = self.state.write().await;
        if let Some(slot) = state.products.get_mut(&product_id) {
            *slot = default_cost_center;
        }
    }

    /// 直接写入实体，跳过全部约束（用于构造异常数据）
    pub async fn insert_unchecked(&self, center: CostCenter) {
        let mut state = self.state.write().await;
        state.next_id = state.next_id.max(center.id().value());
        state.centers.insert(center.id(), center);
    }
}

#[async_trait]
impl CostCenterRepository for InMemoryCostCenterRepository {
    async fn find_by_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenter>> {
        Ok(self.state.read().await.centers.get(&id).cloned())
    }

    async fn find_parent_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenterId>> {
        let state = self.state.read().await;
        Ok(state.centers.get(&id).and_then(CostCenter::parent_id))
    }

    async fn exists(&self, id: CostCenterId) -> RepositoryResult<bool> {
        Ok(self.state.read().await.centers.contains_key(&id))
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<CostCenterId>,
    ) -> RepositoryResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .centers
            .values()
            .any(|center| center.code() == Some(code) && Some(center.id()) != exclude_id))
    }

    async fn insert(&self, new: &NewCostCenter) -> RepositoryResult<CostCenter> {
        let mut state = self.state.write().await;
        state.check_unique(&new.name, new.code.as_deref(), None)?;
        state.check_parent(new.parent_id)?;

        state.next_id += 1;
        let center = CostCenter::new(CostCenterId(state.next_id), new.name.clone())
            .with_description(new.description.clone())
            .with_code(new.code.clone())
            .with_parent(new.parent_id)
            .with_audit_info(AuditInfo::now());
        state.centers.insert(center.id(), center.clone());
        Ok(center)
    }

    async fn update(
        &self,
        id: CostCenterId,
        changes: &CostCenterChanges,
    ) -> RepositoryResult<CostCenter> {
        let mut state = self.state.write().await;
        if !state.centers.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        state.check_unique(&changes.name, changes.code.as_deref(), Some(id))?;
        state.check_parent(changes.parent_id)?;

        let center = state
            .centers
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        center.apply_changes(changes);
        Ok(center.clone())
    }

    async fn delete(&self, id: CostCenterId) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if !state.centers.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if state.children_of(id).next().is_some() || state.product_count(id) > 0 {
            return Err(RepositoryError::ForeignKeyViolation);
        }
        state.centers.remove(&id);
        Ok(())
    }

    async fn count_children(&self, id: CostCenterId) -> RepositoryResult<u64> {
        Ok(self.state.read().await.children_of(id).count() as u64)
    }

    async fn count_products(&self, id: CostCenterId) -> RepositoryResult<u64> {
        Ok(self.state.read().await.product_count(id))
    }

    async fn list_page(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<PagedResult<CostCenterListItem>> {
        let state = self.state.read().await;
        let sorted = state.sorted_by_name();
        let total = sorted.len() as u64;

        let items = sorted
            .into_iter()
            .skip(pagination.offset() as usize)
            .take(pagination.limit() as usize)
            .map(|center| {
                let parent = center
                    .parent_id()
                    .and_then(|parent| state.centers.get(&parent))
                    .map(ParentSummary::from);
                let mut children: Vec<ChildSummary> = state
                    .children_of(center.id())
                    .map(|child| ChildSummary {
                        id: child.id(),
                        name: child.name().to_string(),
                    })
                    .collect();
                children.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

                CostCenterListItem::new(
                    center.clone(),
                    parent,
                    children,
                    state.product_count(center.id()),
                )
            })
            .collect();

        Ok(PagedResult::new(items, total, &pagination))
    }

    async fn list_options(
        &self,
        filter: CostCenterFilter,
    ) -> RepositoryResult<Vec<CostCenterOption>> {
        let state = self.state.read().await;
        Ok(state
            .sorted_by_name()
            .into_iter()
            .filter(|center| filter.matches(center))
            .map(CostCenterOption::from)
            .collect())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<CostCenter>> {
        let state = self.state.read().await;
        Ok(state.sorted_by_name().into_iter().cloned().collect())
    }
}
