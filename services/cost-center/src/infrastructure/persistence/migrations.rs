//! 内嵌的数据库迁移

use pms_adapter_postgres::Migration;

/// 按版本排列的迁移
pub fn migrations() -> Vec<Migration> {
    vec![Migration::new(
        1,
        "cost_centers",
        include_str!("../../../migrations/0001_cost_centers.sql"),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let migrations = migrations();
        assert!(!migrations.is_empty());
        assert!(migrations.windows(2).all(|w| w[0].version < w[1].version));
        assert!(migrations[0].up_sql.contains("cost_centers_code_key"));
    }
}
