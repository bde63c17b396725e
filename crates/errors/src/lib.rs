//! pms-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// 唯一性冲突（名称、编码重复等）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 层级结构中出现环
    #[error("Hierarchy cycle: {0}")]
    HierarchyCycle(String),

    /// 仍被其他记录引用，无法删除
    #[error("Referential integrity: {0}")]
    ReferentialIntegrity(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn hierarchy_cycle(msg: impl Into<String>) -> Self {
        Self::HierarchyCycle(msg.into())
    }

    pub fn referential_integrity(msg: impl Into<String>) -> Self {
        Self::ReferentialIntegrity(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// 错误类别标签（用于 metrics 和日志）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::HierarchyCycle(_) => "hierarchy_cycle",
            Self::ReferentialIntegrity(_) => "referential_integrity",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
        }
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::HierarchyCycle(_) => 422,
            Self::ReferentialIntegrity(_) => 409,
            Self::Internal(_) => 500,
            Self::Database(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::HierarchyCycle(_) => "hierarchy-cycle",
            Self::ReferentialIntegrity(_) => "referential-integrity",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
        };
        format!("https://api.pms.local/problems/{slug}")
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found",
            Self::Validation(_) => "Validation Error",
            Self::Conflict(_) => "Conflict",
            Self::HierarchyCycle(_) => "Hierarchy Cycle",
            Self::ReferentialIntegrity(_) => "Referential Integrity Violation",
            Self::Internal(_) => "Internal Server Error",
            Self::Database(_) => "Database Error",
        }
        .to_string()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let problem = self.to_problem_details();
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("x").status_code(), 400);
        assert_eq!(AppError::not_found("x").status_code(), 404);
        assert_eq!(AppError::conflict("x").status_code(), 409);
        assert_eq!(AppError::hierarchy_cycle("x").status_code(), 422);
        assert_eq!(AppError::referential_integrity("x").status_code(), 409);
        assert_eq!(AppError::database("x").status_code(), 500);
    }

    #[test]
    fn test_problem_details() {
        let err = AppError::hierarchy_cycle("assignment would create a cycle");
        let problem = err.to_problem_details();

        assert_eq!(problem.status, 422);
        assert_eq!(problem.title, "Hierarchy Cycle");
        assert!(problem.r#type.ends_with("/hierarchy-cycle"));
        assert!(problem.detail.contains("assignment would create a cycle"));

        let json = serde_json::to_value(&problem).unwrap();
        assert!(json.get("instance").is_none());
    }

    #[test]
    fn test_into_response_sets_problem_content_type() {
        let response = AppError::conflict("duplicate code").into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/problem+json"
        );
    }
}
