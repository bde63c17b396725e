//! PostgreSQL 迁移管理模块
//!
//! 服务把 SQL 脚本以 `include_str!` 嵌入二进制，启动时按版本号顺序应用。
//! 已应用的迁移记录在迁移表中，校验和不一致时报错而不是重放。

use std::collections::HashSet;

use pms_errors::{AppError, AppResult};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{info, warn};

/// 迁移记录
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// 迁移定义
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub checksum: String,
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>, up_sql: impl Into<String>) -> Self {
        let up_sql = up_sql.into();
        let checksum = Self::calculate_checksum(&up_sql);
        Self {
            version,
            name: name.into(),
            up_sql,
            checksum,
        }
    }

    fn calculate_checksum(sql: &str) -> String {
        hex::encode(Sha256::digest(sql.as_bytes()))
    }
}

/// 迁移记录表
const MIGRATION_TABLE: &str = "_migrations";

/// 迁移管理器
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 初始化迁移表
    pub async fn init(&self) -> AppResult<()> {
        let create_sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                version BIGINT PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                checksum VARCHAR(64) NOT NULL
            )
            "#,
            MIGRATION_TABLE
        );

        sqlx::query(&create_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create migration table: {}", e)))?;

        info!(table = MIGRATION_TABLE, "Migration table initialized");
        Ok(())
    }

    /// 获取已应用的迁移
    pub async fn get_applied_migrations(&self) -> AppResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT version, name, applied_at, checksum FROM {} ORDER BY version ASC",
            MIGRATION_TABLE
        );

        sqlx::query_as::<_, MigrationRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get migrations: {}", e)))
    }

    /// 在单个事务中应用一个迁移
    pub async fn apply(&self, migration: &Migration) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        // 脚本可能包含多条语句，走简单查询协议
        sqlx::raw_sql(&migration.up_sql)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to apply migration {}: {}",
                    migration.version, e
                ))
            })?;

        let insert_sql = format!(
            "INSERT INTO {} (version, name, checksum) VALUES ($1, $2, $3)",
            MIGRATION_TABLE
        );
        sqlx::query(&insert_sql)
            .bind(migration.version)
            .bind(&migration.name)
            .bind(&migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to record migration: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit migration: {}", e)))?;

        info!(
            version = migration.version,
            name = %migration.name,
            "Migration applied successfully"
        );

        Ok(())
    }

    /// 应用所有待处理的迁移
    pub async fn migrate(&self, migrations: &[Migration]) -> AppResult<MigrationResult> {
        self.init().await?;

        let applied = self.get_applied_migrations().await?;
        let mut result = plan_migrations(&applied, migrations);

        for version in result.pending.clone() {
            let Some(migration) = migrations.iter().find(|m| m.version == version) else {
                continue;
            };
            match self.apply(migration).await {
                Ok(()) => result.applied.push(migration.version),
                Err(e) => {
                    warn!(version = migration.version, error = %e, "Migration failed");
                    result.errors.push(MigrationError {
                        version: migration.version,
                        name: migration.name.clone(),
                        error: e.to_string(),
                    });
                    // 停止后续迁移
                    break;
                }
            }
        }

        Ok(result)
    }
}

/// 对比已应用记录，得出待应用 / 跳过 / 校验和不一致的迁移
fn plan_migrations(applied: &[MigrationRecord], migrations: &[Migration]) -> MigrationResult {
    let applied_versions: HashSet<i64> = applied.iter().map(|m| m.version).collect();

    let mut result = MigrationResult::default();

    let mut sorted: Vec<&Migration> = migrations.iter().collect();
    sorted.sort_by_key(|m| m.version);

    for migration in sorted {
        if !applied_versions.contains(&migration.version) {
            result.pending.push(migration.version);
            continue;
        }

        let modified = applied
            .iter()
            .any(|r| r.version == migration.version && r.checksum != migration.checksum);
        if modified {
            result.errors.push(MigrationError {
                version: migration.version,
                name: migration.name.clone(),
                error: "Checksum mismatch - migration has been modified".to_string(),
            });
        } else {
            result.skipped.push(migration.version);
        }
    }

    result
}

/// 迁移结果
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    /// 计划应用的迁移版本
    pub pending: Vec<i64>,
    /// 已应用的迁移版本
    pub applied: Vec<i64>,
    /// 跳过的迁移版本
    pub skipped: Vec<i64>,
    pub errors: Vec<MigrationError>,
}

impl MigrationResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

/// 迁移错误
#[derive(Debug, Clone)]
pub struct MigrationError {
    pub version: i64,
    pub name: String,
    pub error: String,
}
