//! cost-center - 成本中心层级服务
//!
//! 维护成本中心树：创建、更新（防止层级成环）、删除（检查子级和产品引用）
//! 以及带父级、子级和产品计数的分页列表

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
