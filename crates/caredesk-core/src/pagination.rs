use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query-string numbers arrive as strings; treat empty values as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Page-based pagination query parameters (`?page=2&limit=25`).
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(10),
        }
    }
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total_items: i64,
    pub item_count: i64,
    pub items_per_page: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

impl PaginationMeta {
    pub fn new(total_items: i64, item_count: usize, params: &PaginationParams) -> Self {
        let items_per_page = params.limit();
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + items_per_page - 1) / items_per_page
        };

        Self {
            total_items,
            item_count: item_count as i64,
            items_per_page,
            total_pages,
            current_page: params.page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let params = PaginationParams { page: None, limit: None };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn offset_is_derived_from_page_and_limit() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(25),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(500),
        };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams {
            page: Some(1),
            limit: Some(0),
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn page_floor_is_one() {
        let params = PaginationParams {
            page: Some(-4),
            limit: Some(10),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn deserializes_query_string_numbers() {
        let params: PaginationParams = serde_json::from_str(r#"{"page":"2","limit":"25"}"#).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.limit(), 25);
    }

    #[test]
    fn empty_strings_fall_back_to_defaults() {
        let params: PaginationParams = serde_json::from_str(r#"{"page":"","limit":""}"#).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn meta_rounds_total_pages_up() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(21, 10, &params);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.item_count, 10);
        assert_eq!(meta.current_page, 1);
    }

    #[test]
    fn meta_for_empty_result_set() {
        let params = PaginationParams {
            page: Some(1),
            limit: Some(10),
        };
        let meta = PaginationMeta::new(0, 0, &params);
        assert_eq!(meta.total_pages, 0);
        assert_eq!(meta.total_items, 0);
    }
}
