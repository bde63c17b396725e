//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use pms_adapter_postgres::Migration;
use pms_config::AppConfig;
use pms_errors::AppResult;
use pms_telemetry::init_metrics;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::health::health_routes;
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行 HTTP 服务
///
/// 所有服务的统一入口点：
/// 1. 加载配置并初始化日志
/// 2. 安装 Prometheus recorder
/// 3. 连接数据库（带重试）并应用迁移
/// 4. 调用 `router_builder` 构建业务路由，合并健康检查路由
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run("config", &MIGRATIONS, |infra| async move {
///         Ok(my_routes(infra.postgres_pool()))
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(
    config_dir: &str,
    migrations: &[Migration],
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = if config.telemetry.metrics_enabled {
        match init_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "Metrics recorder unavailable, continuing without /metrics");
                None
            }
        }
    } else {
        None
    };

    let infra = Infrastructure::from_config(config.clone()).await?;
    infra.run_migrations(migrations).await?;

    let pool = infra.postgres_pool();
    let app = router_builder(infra)
        .await?
        .merge(health_routes(pool, metrics))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}
