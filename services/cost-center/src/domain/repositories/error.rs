//! 仓储错误
//!
//! 存储层把底层错误归类为带标签的变体，调用方按变体分支而不是解析错误文本

use derive_more::Display;
use pms_errors::AppError;
use thiserror::Error;

/// 触发唯一约束的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UniqueField {
    #[display("name")]
    Name,
    #[display("code")]
    Code,
}

/// 仓储错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: UniqueField },

    /// 外键约束失败（父级不存在或记录仍被引用）
    #[error("Foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("Record not found")]
    NotFound,

    #[error("Database error while {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn database(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Database {
            operation,
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::UniqueViolation {
                field: UniqueField::Name,
            } => AppError::conflict("A cost center with this name already exists"),
            RepositoryError::UniqueViolation {
                field: UniqueField::Code,
            } => AppError::conflict("A cost center with this code already exists"),
            RepositoryError::ForeignKeyViolation => {
                AppError::not_found("Referenced cost center does not exist")
            }
            RepositoryError::NotFound => AppError::not_found("Cost center not found"),
            RepositoryError::Database { operation, message } => {
                AppError::database(format!("Error while {operation}: {message}"))
            }
        }
    }
}
