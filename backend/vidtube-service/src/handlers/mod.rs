use std::collections::HashMap;

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod health;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod users;
pub mod videos;

/// 1-based page window parsed from the raw query map. Junk or missing
/// values coerce to the defaults instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

impl Page {
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let page = query
            .get("page")
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);

        let limit = query
            .get("limit")
            .and_then(|l| l.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        Self { page, limit }
    }

    pub fn offset(self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_absent() {
        let page = Page::from_query(&query(&[]));
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_window_math() {
        let page = Page::from_query(&query(&[("page", "2"), ("limit", "5")]));
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit, 5);
    }

    #[test]
    fn test_junk_coerces_to_defaults() {
        let page = Page::from_query(&query(&[("page", "two"), ("limit", "ten")]));
        assert_eq!(page, Page { page: 1, limit: 10 });
    }

    #[test]
    fn test_non_positive_values_coerce_to_defaults() {
        let page = Page::from_query(&query(&[("page", "0"), ("limit", "-3")]));
        assert_eq!(page, Page { page: 1, limit: 10 });
    }

    #[test]
    fn test_limit_is_capped() {
        let page = Page::from_query(&query(&[("limit", "5000")]));
        assert_eq!(page.limit, 100);
    }
}
