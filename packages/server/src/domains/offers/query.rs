//! Search query specification for offers.
//!
//! The raw query-string inputs are normalized into a value object
//! (`ValidatedOfferQuery`) by pure functions, so filter semantics are
//! testable without a database. Normalization never fails: a numeric field
//! that does not parse imposes no constraint, and an unknown sort value
//! means store-default order.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::common::pagination::{PageArgs, ValidatedPageArgs};

/// Supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    /// Parse the query-string value; anything unknown sorts by store order.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "price-asc" => Some(SortKey::PriceAsc),
            "price-desc" => Some(SortKey::PriceDesc),
            _ => None,
        }
    }
}

/// Raw search inputs as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferQuery {
    pub title: Option<String>,
    #[serde(rename = "priceMin")]
    pub price_min: Option<String>,
    #[serde(rename = "priceMax")]
    pub price_max: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl OfferQuery {
    /// Build the query specification. Absent or unparseable fields impose
    /// no constraint.
    pub fn validate(&self) -> ValidatedOfferQuery {
        let title = self
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        let price_min = self
            .price_min
            .as_deref()
            .and_then(|p| p.parse::<Decimal>().ok());
        let price_max = self
            .price_max
            .as_deref()
            .and_then(|p| p.parse::<Decimal>().ok());

        let sort = self.sort.as_deref().and_then(SortKey::parse);

        let page = PageArgs {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
        .validate();

        ValidatedOfferQuery {
            title,
            price_min,
            price_max,
            sort,
            page,
        }
    }
}

/// Normalized query specification: predicate + sort + pagination window.
#[derive(Debug, Clone)]
pub struct ValidatedOfferQuery {
    /// Case-insensitive substring match on the offer name.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound.
    pub price_max: Option<Decimal>,
    pub sort: Option<SortKey>,
    pub page: ValidatedPageArgs,
}

impl ValidatedOfferQuery {
    /// The filter predicate, usable independently of any storage backend.
    pub fn matches(&self, name: &str, price: Decimal) -> bool {
        if let Some(title) = &self.title {
            if !name.to_lowercase().contains(&title.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.price_min {
            if price < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if price > max {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn query() -> OfferQuery {
        OfferQuery::default()
    }

    #[test]
    fn test_empty_query_imposes_no_constraint() {
        let v = query().validate();
        assert!(v.title.is_none());
        assert!(v.price_min.is_none());
        assert!(v.price_max.is_none());
        assert!(v.sort.is_none());
        assert!(v.matches("anything", dec("0")));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let v = OfferQuery {
            price_min: Some("10".to_string()),
            price_max: Some("50".to_string()),
            ..query()
        }
        .validate();

        assert!(v.matches("shoes", dec("10")));
        assert!(v.matches("shoes", dec("50")));
        assert!(!v.matches("shoes", dec("9.99")));
        assert!(!v.matches("shoes", dec("50.01")));
    }

    #[test]
    fn test_lower_bound_alone() {
        let v = OfferQuery {
            price_min: Some("10".to_string()),
            ..query()
        }
        .validate();

        assert!(v.matches("shoes", dec("10")));
        assert!(v.matches("shoes", dec("10000")));
        assert!(!v.matches("shoes", dec("9")));
    }

    #[test]
    fn test_unparseable_price_is_treated_as_absent() {
        let v = OfferQuery {
            price_min: Some("cheap".to_string()),
            price_max: Some("".to_string()),
            ..query()
        }
        .validate();

        assert!(v.price_min.is_none());
        assert!(v.price_max.is_none());
        assert!(v.matches("shoes", dec("1")));
    }

    #[test]
    fn test_title_match_is_case_insensitive_substring() {
        let v = OfferQuery {
            title: Some("AiR".to_string()),
            ..query()
        }
        .validate();

        assert!(v.matches("Nike Air Max", dec("1")));
        assert!(!v.matches("Adidas Gazelle", dec("1")));
    }

    #[test]
    fn test_blank_title_imposes_no_constraint() {
        let v = OfferQuery {
            title: Some("   ".to_string()),
            ..query()
        }
        .validate();
        assert!(v.title.is_none());
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(SortKey::parse("price-asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse("price-desc"), Some(SortKey::PriceDesc));
        assert_eq!(SortKey::parse("newest"), None);

        let v = OfferQuery {
            sort: Some("price-desc".to_string()),
            ..query()
        }
        .validate();
        assert_eq!(v.sort, Some(SortKey::PriceDesc));
    }

    #[test]
    fn test_page_window_normalization() {
        let v = OfferQuery {
            page: Some("0".to_string()),
            limit: Some("2".to_string()),
            ..query()
        }
        .validate();

        assert_eq!(v.page.page, 1);
        assert_eq!(v.page.limit, 2);
        assert_eq!(v.page.offset(), 0);
    }
}
