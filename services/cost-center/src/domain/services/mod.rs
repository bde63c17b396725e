//! 领域服务

pub mod hierarchy;

pub use hierarchy::{build_tree, would_create_cycle};
