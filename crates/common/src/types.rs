//! 通用类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 审计信息
///
/// 时间戳由存储层写入，领域层只读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditInfo {
    pub fn new(created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    pub fn now() -> Self {
        let now = Utc::now();
        Self::new(now, now)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::now()
    }
}

/// 分页参数（页码从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// 创建分页参数，页码小于 1 取 1，页大小为 0 取默认值
    ///
    /// 页大小不设上限，总页数按调用方请求的页大小计算
    pub fn new(page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        let page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        Self { page, page_size }
    }

    /// 从可选参数构造
    pub fn from_options(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64) as u32
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
