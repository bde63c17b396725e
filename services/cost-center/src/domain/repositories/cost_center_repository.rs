//! 成本中心仓储接口

use async_trait::async_trait;
use pms_common::types::{PagedResult, Pagination};

use super::RepositoryResult;
use crate::domain::entities::{
    CostCenter, CostCenterChanges, CostCenterFilter, CostCenterListItem, CostCenterOption,
    NewCostCenter,
};
use crate::domain::value_objects::CostCenterId;

/// 成本中心仓储接口
#[async_trait]
pub trait CostCenterRepository: Send + Sync {
    /// 根据 ID 查找
    async fn find_by_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenter>>;

    /// 查找父级 ID，根节点或记录不存在时返回 None
    async fn find_parent_id(&self, id: CostCenterId) -> RepositoryResult<Option<CostCenterId>>;

    /// 检查记录是否存在
    async fn exists(&self, id: CostCenterId) -> RepositoryResult<bool>;

    /// 检查编码是否已被使用（精确匹配，可排除指定记录）
    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<CostCenterId>,
    ) -> RepositoryResult<bool>;

    /// 插入新记录，返回带生成 ID 的实体
    async fn insert(&self, new: &NewCostCenter) -> RepositoryResult<CostCenter>;

    /// 覆盖更新，记录不存在时返回 NotFound
    async fn update(
        &self,
        id: CostCenterId,
        changes: &CostCenterChanges,
    ) -> RepositoryResult<CostCenter>;

    /// 删除记录，记录不存在时返回 NotFound
    async fn delete(&self, id: CostCenterId) -> RepositoryResult<()>;

    /// 直接子级数量
    async fn count_children(&self, id: CostCenterId) -> RepositoryResult<u64>;

    /// 以该成本中心为默认成本中心的产品数量
    async fn count_products(&self, id: CostCenterId) -> RepositoryResult<u64>;

    /// 按名称升序分页查询，附带父级、子级和产品计数
    async fn list_page(
        &self,
        pagination: Pagination,
    ) -> RepositoryResult<PagedResult<CostCenterListItem>>;

    /// 选择器列表，按名称升序
    async fn list_options(
        &self,
        filter: CostCenterFilter,
    ) -> RepositoryResult<Vec<CostCenterOption>>;

    /// 全部记录，按名称升序
    async fn list_all(&self) -> RepositoryResult<Vec<CostCenter>>;
}
