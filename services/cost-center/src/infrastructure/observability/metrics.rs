//! 业务指标

use metrics::counter;
use pms_errors::AppResult;

/// 成本中心操作计数（按操作和结果）
pub const OPERATIONS_TOTAL: &str = "cost_center_operations_total";

/// 记录一次操作结果，失败时结果标签为错误类别
pub fn record_operation<T>(operation: &'static str, result: &AppResult<T>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    counter!(OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}
