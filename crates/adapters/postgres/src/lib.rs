//! pms-adapter-postgres - PostgreSQL 适配器

mod connection;
mod error;
mod migration;

pub use connection::*;
pub use error::*;
pub use migration::*;
