//! 可观测性

pub mod metrics;

pub use self::metrics::record_operation;
