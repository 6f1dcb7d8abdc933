//! Query-string sanitization for the listing list endpoint
//!
//! Raw parameters arrive as optional strings. [`ListingQueryParams::sanitize`]
//! turns them into a typed [`ListingFilters`], collecting every problem instead
//! of stopping at the first.

use serde::{Deserialize, Serialize};

use super::types::{ListingType, PropertyType};
use crate::features::shared::validation::FieldViolation;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest accepted `limit`.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Page size for filters built in code rather than from a request.
pub const INTERNAL_PAGE_LIMIT: i64 = 50;

/// Raw query parameters for `GET /listings`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQueryParams {
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub property_type: Option<String>,
    pub verified: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Typed, bounds-checked listing filters
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilters {
    pub listing_type: Option<ListingType>,
    pub property_type: Option<PropertyType>,
    pub verified: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for ListingFilters {
    fn default() -> Self {
        Self {
            listing_type: None,
            property_type: None,
            verified: None,
            min_price: None,
            max_price: None,
            search: None,
            limit: INTERNAL_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl ListingQueryParams {
    pub fn sanitize(self) -> Result<ListingFilters, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let listing_type = present(self.listing_type).and_then(|raw| {
            raw.parse::<ListingType>()
                .map_err(|_| {
                    violations.push(FieldViolation::new(
                        "type",
                        format!("type must be one of: {}", ListingType::NAMES.join(", ")),
                    ))
                })
                .ok()
        });

        let property_type = present(self.property_type).and_then(|raw| {
            raw.parse::<PropertyType>()
                .map_err(|_| {
                    violations.push(FieldViolation::new(
                        "propertyType",
                        format!("propertyType must be one of: {}", PropertyType::NAMES.join(", ")),
                    ))
                })
                .ok()
        });

        let verified = present(self.verified).and_then(|raw| {
            match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => {
                    violations.push(FieldViolation::new(
                        "verified",
                        "verified must be 'true' or 'false'",
                    ));
                    None
                },
            }
        });

        let min_price = parse_price("minPrice", self.min_price, &mut violations);
        let max_price = parse_price("maxPrice", self.max_price, &mut violations);
        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                violations.push(FieldViolation::new(
                    "minPrice",
                    "minPrice must be less than or equal to maxPrice",
                ));
            }
        }

        let search = present(self.search).and_then(|raw| sanitize_search(&raw));

        let limit = match present(self.limit) {
            None => DEFAULT_PAGE_LIMIT,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if (1..=MAX_PAGE_LIMIT).contains(&n) => n,
                _ => {
                    violations.push(FieldViolation::new(
                        "limit",
                        format!("limit must be an integer between 1 and {}", MAX_PAGE_LIMIT),
                    ));
                    DEFAULT_PAGE_LIMIT
                },
            },
        };

        let offset = match present(self.offset) {
            None => 0,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(n) if n >= 0 => n,
                _ => {
                    violations.push(FieldViolation::new(
                        "offset",
                        "offset must be a non-negative integer",
                    ));
                    0
                },
            },
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(ListingFilters {
            listing_type,
            property_type,
            verified,
            min_price,
            max_price,
            search,
            limit,
            offset,
        })
    }
}

/// `?type=` is the same as no `type` at all.
fn present(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

fn parse_price(
    field: &str,
    raw: Option<String>,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let raw = present(raw)?;
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        _ => {
            violations.push(FieldViolation::new(
                field,
                format!("{} must be a non-negative number", field),
            ));
            None
        },
    }
}

/// Trim, strip `< > ' "`, trim again. Empty results are dropped.
pub fn sanitize_search(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '\'' | '"'))
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn params() -> ListingQueryParams {
        ListingQueryParams::default()
    }

    fn violated_fields(params: ListingQueryParams) -> Vec<String> {
        params
            .sanitize()
            .unwrap_err()
            .into_iter()
            .map(|v| v.field)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let filters = params().sanitize().unwrap();
        assert_eq!(filters.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(filters.offset, 0);
        assert_eq!(filters.search, None);
        assert_eq!(ListingFilters::default().limit, INTERNAL_PAGE_LIMIT);
    }

    #[test]
    fn test_typed_values() {
        let filters = ListingQueryParams {
            listing_type: Some("Co-living".into()),
            property_type: Some("Girls".into()),
            verified: Some("TRUE".into()),
            min_price: Some("1000".into()),
            max_price: Some("2500.50".into()),
            limit: Some("25".into()),
            offset: Some("50".into()),
            ..params()
        }
        .sanitize()
        .unwrap();

        assert_eq!(filters.listing_type, Some(ListingType::CoLiving));
        assert_eq!(filters.property_type, Some(PropertyType::Girls));
        assert_eq!(filters.verified, Some(true));
        assert_eq!(filters.min_price, Some(1000.0));
        assert_eq!(filters.max_price, Some(2500.5));
        assert_eq!((filters.limit, filters.offset), (25, 50));
    }

    #[test]
    fn test_empty_strings_are_absent() {
        let filters = ListingQueryParams {
            listing_type: Some(String::new()),
            verified: Some(" ".into()),
            limit: Some(String::new()),
            ..params()
        }
        .sanitize()
        .unwrap();
        assert_eq!(filters.listing_type, None);
        assert_eq!(filters.verified, None);
        assert_eq!(filters.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_verified_is_strict() {
        let fields = violated_fields(ListingQueryParams {
            verified: Some("yes".into()),
            ..params()
        });
        assert_eq!(fields, vec!["verified"]);

        let filters = ListingQueryParams {
            verified: Some("False".into()),
            ..params()
        }
        .sanitize()
        .unwrap();
        assert_eq!(filters.verified, Some(false));
    }

    #[test]
    fn test_min_price_above_max_price() {
        let fields = violated_fields(ListingQueryParams {
            min_price: Some("5000".into()),
            max_price: Some("1000".into()),
            ..params()
        });
        assert_eq!(fields, vec!["minPrice"]);
    }

    #[test]
    fn test_violations_accumulate() {
        let fields = violated_fields(ListingQueryParams {
            listing_type: Some("Villa".into()),
            property_type: Some("Anyone".into()),
            min_price: Some("cheap".into()),
            max_price: Some("-1".into()),
            limit: Some("0".into()),
            offset: Some("-5".into()),
            ..params()
        });
        assert_eq!(
            fields,
            vec!["type", "propertyType", "minPrice", "maxPrice", "limit", "offset"]
        );
    }

    #[test]
    fn test_limit_bounds() {
        for bad in ["101", "0", "ten", "2.5"] {
            let fields = violated_fields(ListingQueryParams {
                limit: Some(bad.into()),
                ..params()
            });
            assert_eq!(fields, vec!["limit"], "limit={}", bad);
        }
        let filters = ListingQueryParams {
            limit: Some("100".into()),
            ..params()
        }
        .sanitize()
        .unwrap();
        assert_eq!(filters.limit, 100);
    }

    #[test]
    fn test_non_finite_prices_rejected() {
        let fields = violated_fields(ListingQueryParams {
            min_price: Some("inf".into()),
            max_price: Some("NaN".into()),
            ..params()
        });
        assert_eq!(fields, vec!["minPrice", "maxPrice"]);
    }

    #[test]
    fn test_sanitize_search() {
        assert_eq!(sanitize_search("<script>"), Some("script".to_string()));
        assert_eq!(sanitize_search("  \"quoted\" 'term' "), Some("quoted term".to_string()));
        assert_eq!(sanitize_search(" <> "), None);
        assert_eq!(sanitize_search("50% off_"), Some("50% off_".to_string()));
    }
}
