//! 应用层

pub mod commands;
pub mod handlers;
pub mod queries;
pub mod query_handlers;

pub use commands::*;
pub use handlers::CostCenterCommandHandler;
pub use queries::*;
pub use query_handlers::CostCenterQueryHandler;
