//! 基础设施资源管理

use std::time::Duration;

use pms_adapter_postgres::{Migration, MigrationManager, PostgresConfig, create_pool};
use pms_config::AppConfig;
use pms_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};

/// 基础设施资源容器
///
/// 连接池内部是引用计数的，clone 开销很小
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections)
            .with_min_connections(config.database.min_connections)
            .with_connect_timeout(Duration::from_secs(config.database.connect_timeout_secs));

        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            "PostgreSQL connection pool created (max_connections: {})",
            config.database.max_connections
        );

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    /// 应用服务自带的迁移
    pub async fn run_migrations(&self, migrations: &[Migration]) -> AppResult<()> {
        if !self.config.database.run_migrations {
            info!("Migrations disabled by configuration");
            return Ok(());
        }

        let result = MigrationManager::new(self.postgres_pool.clone())
            .migrate(migrations)
            .await?;

        if let Some(failed) = result.errors.first() {
            return Err(AppError::database(format!(
                "Migration {} ({}) failed: {}",
                failed.version, failed.name, failed.error
            )));
        }

        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Migrations up to date"
        );
        Ok(())
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }
}
