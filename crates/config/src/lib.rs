//! pms-config - 配置加载库
//!
//! 配置来源（后者覆盖前者）：
//! 1. `{config_dir}/default.toml`
//! 2. `{config_dir}/{APP_ENV}.toml`
//! 3. `APP_` 前缀的环境变量，嵌套字段用 `__` 分隔（如 `APP_DATABASE__URL`）

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// 启动时执行内置迁移
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    // 开发环境: 10, 生产环境: 50
    match std::env::var("APP_ENV").as_deref() {
        Ok("production") => 50,
        _ => 10,
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_run_migrations() -> bool {
    true
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 暴露 /metrics 端点
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let figment = Figment::new()
            .merge(Serialized::default("app_env", &env))
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(Env::prefixed("APP_").split("__"));

        Self::from_figment(figment)
    }

    /// 从已组装的 Figment 提取并校验配置
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Invalid("app_name must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "database.min_connections must not exceed database.max_connections".to_string(),
            ));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
