//! 值对象模块

mod ids;

pub use ids::CostCenterId;
