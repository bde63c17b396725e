//! 强类型 ID 定义

use derive_more::{Display, From};
use pms_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 成本中心 ID（数据库自增主键）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct CostCenterId(pub i64);

impl CostCenterId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// 解析表单中的 ID 字段，空白视为未提供
    pub fn parse_optional(raw: Option<&str>, field_name: &str) -> AppResult<Option<Self>> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| AppError::validation(format!("Invalid {field_name}: {value}"))),
        }
    }

    /// 解析必填的记录 ID，要求为正整数
    pub fn parse_required(raw: Option<&str>, field_name: &str) -> AppResult<Self> {
        match Self::parse_optional(raw, field_name)? {
            Some(id) if id.0 > 0 => Ok(id),
            _ => Err(AppError::validation(format!(
                "Invalid {field_name}: {}",
                raw.unwrap_or_default()
            ))),
        }
    }
}

impl FromStr for CostCenterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
