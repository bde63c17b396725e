//! 持久化层

mod memory;
mod migrations;
mod postgres;
mod rows;

pub use memory::InMemoryCostCenterRepository;
pub use migrations::migrations;
pub use postgres::PostgresCostCenterRepository;
