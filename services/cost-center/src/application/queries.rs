//! 成本中心查询定义

use pms_common::types::Pagination;
use pms_errors::{AppError, AppResult};

use crate::domain::value_objects::CostCenterId;

/// 分页列表查询
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCostCentersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListCostCentersQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// 解析查询字符串中的分页参数
    ///
    /// 空白视为未提供，非整数为校验错误；小于 1 的值交给 `Pagination` 回退到默认值
    pub fn parse(raw_page: Option<&str>, raw_page_size: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            page: parse_page_number(raw_page, "page")?,
            page_size: parse_page_number(raw_page_size, "page size")?,
        })
    }

    /// 页码默认 1，页大小默认 10
    pub fn pagination(&self) -> Pagination {
        Pagination::from_options(self.page, self.page_size)
    }
}

fn parse_page_number(raw: Option<&str>, field_name: &str) -> AppResult<Option<u32>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let number: i64 = value
                .parse()
                .map_err(|_| AppError::validation(format!("Invalid {field_name}: {value}")))?;
            Ok(Some(u32::try_from(number.max(0)).unwrap_or(u32::MAX)))
        }
    }
}

/// 按 ID 查询
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetCostCenterQuery {
    pub id: CostCenterId,
}

impl GetCostCenterQuery {
    pub fn parse(raw_id: &str) -> AppResult<Self> {
        Ok(Self {
            id: CostCenterId::parse_required(Some(raw_id), "cost center id")?,
        })
    }
}

/// 父级候选查询（编辑时排除自身）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParentCandidatesQuery {
    pub exclude_id: Option<CostCenterId>,
}

impl ListParentCandidatesQuery {
    pub fn parse(raw_exclude_id: Option<&str>) -> AppResult<Self> {
        Ok(Self {
            exclude_id: CostCenterId::parse_optional(raw_exclude_id, "excluded cost center id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let pagination = ListCostCentersQuery::default().pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 10);
    }

    #[test]
    fn test_list_query_keeps_requested_page_size() {
        let pagination = ListCostCentersQuery::new(0, 1000).pagination();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 1000);
    }

    #[test]
    fn test_list_query_parse() {
        let query = ListCostCentersQuery::parse(Some("2"), Some(" 25 ")).unwrap();
        assert_eq!(query, ListCostCentersQuery::new(2, 25));

        let blank = ListCostCentersQuery::parse(Some(""), None).unwrap();
        assert_eq!(blank, ListCostCentersQuery::default());

        let negative = ListCostCentersQuery::parse(Some("-3"), Some("0")).unwrap();
        assert_eq!(negative.pagination().page, 1);
        assert_eq!(negative.pagination().page_size, 10);
    }

    #[test]
    fn test_list_query_rejects_non_numeric() {
        let err = ListCostCentersQuery::parse(Some("two"), None).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("page")));
        assert!(ListCostCentersQuery::parse(None, Some("10abc")).is_err());
    }

    #[test]
    fn test_get_query_rejects_invalid_id() {
        assert!(GetCostCenterQuery::parse("abc").is_err());
        assert!(GetCostCenterQuery::parse("0").is_err());
        assert_eq!(GetCostCenterQuery::parse("8").unwrap().id, CostCenterId(8));
    }

    #[test]
    fn test_parent_candidates_exclude() {
        assert_eq!(ListParentCandidatesQuery::parse(None).unwrap().exclude_id, None);
        assert_eq!(
            ListParentCandidatesQuery::parse(Some("5")).unwrap().exclude_id,
            Some(CostCenterId(5))
        );
        assert!(ListParentCandidatesQuery::parse(Some("five")).is_err());
    }
}
