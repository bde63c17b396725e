//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use pms_adapter_postgres::check_connection;
use serde::Serialize;
use sqlx::PgPool;

/// 健康检查状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub checks: Vec<ComponentHealth>,
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            message: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

#[derive(Clone)]
struct HealthState {
    pool: PgPool,
    metrics: Option<PrometheusHandle>,
}

/// 构建健康检查路由
pub fn health_routes(pool: PgPool, metrics: Option<PrometheusHandle>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(HealthState { pool, metrics })
}

/// Liveness：只说明进程在运行
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::healthy()))
}

/// Readiness：检查数据库是否可用
async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let mut status = HealthStatus::healthy();
    match check_connection(&state.pool).await {
        Ok(()) => status.add_check(ComponentHealth::healthy("postgres")),
        Err(e) => status.add_check(ComponentHealth::unhealthy("postgres", e.to_string())),
    }

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn metrics_handler(State(state): State<HealthState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            handle.render(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "metrics disabled".to_string(),
        ),
    }
}
