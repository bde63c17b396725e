//! 领域层
//!
//! 包含实体、值对象、仓储接口和层级规则

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
