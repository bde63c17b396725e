//! sqlx 错误分类
//!
//! 把 PostgreSQL SQLSTATE 转成结构化的错误类别，调用方按类别分支，
//! 不需要解析错误文本

/// unique_violation
pub const UNIQUE_VIOLATION: &str = "23505";

/// foreign_key_violation
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// 数据库错误类别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbErrorKind {
    /// 唯一约束冲突，携带触发的约束名
    UniqueViolation { constraint: Option<String> },
    /// 外键约束冲突
    ForeignKeyViolation { constraint: Option<String> },
    /// 查询期望一行但没有结果
    RowNotFound,
    Other,
}

/// 对 sqlx 错误分类
pub fn classify_error(error: &sqlx::Error) -> DbErrorKind {
    match error {
        sqlx::Error::RowNotFound => DbErrorKind::RowNotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            classify_code(code.as_deref(), db_err.constraint())
        }
        _ => DbErrorKind::Other,
    }
}

/// 按 SQLSTATE 和约束名分类
pub fn classify_code(code: Option<&str>, constraint: Option<&str>) -> DbErrorKind {
    let constraint = constraint.map(str::to_string);
    match code {
        Some(UNIQUE_VIOLATION) => DbErrorKind::UniqueViolation { constraint },
        Some(FOREIGN_KEY_VIOLATION) => DbErrorKind::ForeignKeyViolation { constraint },
        _ => DbErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unique_violation() {
        let kind = classify_code(Some("23505"), Some("cost_centers_code_key"));
        assert_eq!(
            kind,
            DbErrorKind::UniqueViolation {
                constraint: Some("cost_centers_code_key".to_string())
            }
        );
    }

    #[test]
    fn test_classify_foreign_key_violation() {
        let kind = classify_code(Some("23503"), None);
        assert_eq!(kind, DbErrorKind::ForeignKeyViolation { constraint: None });
    }

    #[test]
    fn test_classify_other_codes() {
        assert_eq!(classify_code(Some("40001"), None), DbErrorKind::Other);
        assert_eq!(classify_code(None, None), DbErrorKind::Other);
    }

    #[test]
    fn test_classify_sqlx_errors() {
        assert_eq!(classify_error(&sqlx::Error::RowNotFound), DbErrorKind::RowNotFound);
        assert_eq!(classify_error(&sqlx::Error::PoolTimedOut), DbErrorKind::Other);
    }
}
