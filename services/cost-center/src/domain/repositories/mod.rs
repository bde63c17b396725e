//! 仓储接口模块

mod cost_center_repository;
mod error;

pub use cost_center_repository::CostCenterRepository;
pub use error::{RepositoryError, RepositoryResult, UniqueField};
