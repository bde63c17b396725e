//! 表单和查询参数

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::{Form, extract::Query};
use pms_errors::{AppError, AppResult};
use serde::Deserialize;

use crate::application::CostCenterFields;

/// 创建 / 编辑表单
///
/// 所有字段按原始字符串接收，校验在命令构造时完成
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub parent_id: Option<String>,
    /// 只在编辑表单中使用
    pub is_active: Option<String>,
}

impl CostCenterForm {
    pub fn fields(&self) -> CostCenterFields {
        CostCenterFields {
            name: self.name.clone(),
            description: self.description.clone(),
            code: self.code.clone(),
            parent_id: self.parent_id.clone(),
        }
    }
}

/// 删除表单
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteForm {
    pub id: Option<String>,
}

/// 分页参数，数字解析在查询构造时完成
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// 父级候选参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCandidatesParams {
    pub exclude_id: Option<String>,
}

/// 表单体无法解析时按校验错误返回
pub fn form_payload<T>(payload: Result<Form<T>, FormRejection>) -> AppResult<T> {
    payload
        .map(|Form(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

/// 查询字符串无法解析时按校验错误返回
pub fn query_payload<T>(payload: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    payload
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}
