//! Caller-supplied parameters for recipe listings.

use super::pagination::{DEFAULT_PAGE, is_valid_window};

/// Page size used when neither the caller nor the configuration supplies one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecipesOptions {
    pub is_admin: bool,
    pub query: String,
    pub page: i64,
    pub page_size: i64,
}

impl Default for ReadRecipesOptions {
    fn default() -> Self {
        Self {
            is_admin: false,
            query: String::new(),
            page: DEFAULT_PAGE,
            page_size: i64::from(DEFAULT_PAGE_SIZE),
        }
    }
}

impl ReadRecipesOptions {
    pub fn new(is_admin: bool, query: impl Into<String>, page: i64, page_size: i64) -> Self {
        Self {
            is_admin,
            query: query.into(),
            page,
            page_size,
        }
    }

    /// Build options from raw query-string values.
    ///
    /// Missing or unparsable numbers fall back to page 1 and `default_page_size`.
    /// Parsable but non-positive numbers are kept as-is; the listing answers
    /// those with an empty page.
    pub fn from_params(
        is_admin: bool,
        search: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
        default_page_size: u32,
    ) -> Self {
        Self {
            is_admin,
            query: search.unwrap_or_default().to_string(),
            page: parse_number(page).unwrap_or(DEFAULT_PAGE),
            page_size: parse_number(page_size).unwrap_or(i64::from(default_page_size)),
        }
    }

    pub fn has_valid_window(&self) -> bool {
        is_valid_window(self.page, self.page_size)
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
