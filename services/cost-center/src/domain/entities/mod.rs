//! 实体模块

mod cost_center;
mod views;

pub use cost_center::{CostCenter, CostCenterChanges, NewCostCenter};
pub use views::*;
