//! Turns raw `count` / `page` / `sortBy` query values into a [`PageRequest`].

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};
use std::fmt::Display;
use std::str::FromStr;
use strum::Display;
use utoipa::IntoParams;

use crate::error::{ProductError, ProductResult};

pub const DEFAULT_PAGE_SIZE: i32 = 10;
pub const DEFAULT_PAGE: i32 = 0;
pub const DEFAULT_SORT_FIELD: &str = "id";

/// Listings are always ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
}

/// Offset/limit/sort descriptor for one listing call.
///
/// Values are carried as given; storage calls [`PageRequest::validate`]
/// before using [`offset`](PageRequest::offset) and [`limit`](PageRequest::limit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub count: i32,
    pub page: i32,
    pub sort_by: String,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Fill in defaults (10, 0, `"id"`) for absent values; an empty `sort_by`
    /// counts as absent. No bounds checks.
    pub fn normalize(count: Option<i32>, page: Option<i32>, sort_by: Option<String>) -> Self {
        Self {
            count: count.unwrap_or(DEFAULT_PAGE_SIZE),
            page: page.unwrap_or(DEFAULT_PAGE),
            sort_by: sort_by
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SORT_FIELD.to_string()),
            direction: SortDirection::Asc,
        }
    }

    /// Reject page sizes below 1 and negative page indexes.
    pub fn validate(&self) -> ProductResult<()> {
        if self.count < 1 {
            return Err(ProductError::InvalidPage(format!(
                "count must be at least 1, got {}",
                self.count
            )));
        }
        if self.page < 0 {
            return Err(ProductError::InvalidPage(format!(
                "page must not be negative, got {}",
                self.page
            )));
        }
        Ok(())
    }

    /// Rows to skip: `page * count`.
    pub fn offset(&self) -> u64 {
        self.page.max(0) as u64 * self.limit()
    }

    /// Rows to return: `count`.
    pub fn limit(&self) -> u64 {
        self.count.max(0) as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalize(None, None, None)
    }
}

/// `?count=` reads as an absent parameter rather than a parse failure.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Paging query string shared by the listing endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size (default 10)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub count: Option<i32>,
    /// Zero-based page index (default 0)
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i32>,
    /// Field to sort by: id, name or price (default id)
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        PageRequest::normalize(query.count, query.page, query.sort_by)
    }
}

/// Query string of the price range listing. Both bounds are inclusive.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    /// Lowest price, inclusive
    #[param(value_type = String, example = "10.00")]
    pub from: Decimal,
    /// Highest price, inclusive
    #[param(value_type = String, example = "20.00")]
    pub to: Decimal,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub count: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i32>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

impl PriceRangeQuery {
    pub fn into_parts(self) -> (Decimal, Decimal, PageRequest) {
        let page = PageRequest::normalize(self.count, self.page, self.sort_by);
        (self.from, self.to, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let page = PageRequest::normalize(None, None, None);
        assert_eq!(page.count, 10);
        assert_eq!(page.page, 0);
        assert_eq!(page.sort_by, "id");
        assert_eq!(page.direction, SortDirection::Asc);
        assert_eq!(page, PageRequest::default());
    }

    #[test]
    fn test_normalize_keeps_given_values() {
        let page = PageRequest::normalize(Some(25), Some(3), Some("price".into()));
        assert_eq!(page.count, 25);
        assert_eq!(page.page, 3);
        assert_eq!(page.sort_by, "price");
        assert_eq!(page.offset(), 75);
        assert_eq!(page.limit(), 25);
    }

    #[test]
    fn test_normalize_passes_out_of_range_values_through() {
        let page = PageRequest::normalize(Some(0), Some(-2), Some("colour".into()));
        assert_eq!(page.count, 0);
        assert_eq!(page.page, -2);
        assert_eq!(page.sort_by, "colour");
    }

    #[test]
    fn test_normalize_treats_empty_sort_field_as_absent() {
        let page = PageRequest::normalize(None, None, Some(String::new()));
        assert_eq!(page.sort_by, "id");
    }

    #[test]
    fn test_validate_rejects_bad_bounds() {
        assert!(PageRequest::normalize(Some(1), Some(0), None).validate().is_ok());
        assert!(matches!(
            PageRequest::normalize(Some(0), None, None).validate(),
            Err(ProductError::InvalidPage(_))
        ));
        assert!(matches!(
            PageRequest::normalize(None, Some(-1), None).validate(),
            Err(ProductError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let page = PageRequest::normalize(Some(i32::MAX), Some(i32::MAX), None);
        assert_eq!(page.offset(), i32::MAX as u64 * i32::MAX as u64);
    }

    #[test]
    fn test_page_query_conversion() {
        let query = PageQuery {
            count: Some(5),
            page: None,
            sort_by: Some("name".into()),
        };
        let page: PageRequest = query.into();
        assert_eq!(page, PageRequest::normalize(Some(5), Some(0), Some("name".into())));
    }

    #[test]
    fn test_page_query_reads_empty_values_as_absent() {
        let query: PageQuery =
            serde_json::from_value(serde_json::json!({ "count": "", "page": "2", "sortBy": "" }))
                .unwrap();
        assert_eq!(query.count, None);
        assert_eq!(query.page, Some(2));

        let page: PageRequest = query.into();
        assert_eq!(page, PageRequest::normalize(None, Some(2), None));

        let missing: PageQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(missing.count, None);
        assert_eq!(missing.page, None);

        let bad = serde_json::from_value::<PageQuery>(serde_json::json!({ "count": "ten" }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_price_range_into_parts() {
        let query = PriceRangeQuery {
            from: Decimal::new(10, 0),
            to: Decimal::new(20, 0),
            count: None,
            page: Some(1),
            sort_by: None,
        };
        let (from, to, page) = query.into_parts();
        assert_eq!(from, Decimal::new(10, 0));
        assert_eq!(to, Decimal::new(20, 0));
        assert_eq!(page.offset(), 10);
    }
}
