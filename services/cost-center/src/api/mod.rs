//! HTTP 表单边界

pub mod forms;
pub mod responses;
pub mod routes;

pub use routes::{CostCenterState, cost_center_routes};
