//! Listing query construction
//!
//! Filters become an ordered list of [`Predicate`]s. The same list drives the
//! SQL renderer (every value bound, never interpolated) and the in-memory
//! evaluator, so both repositories agree on what matches and in which order.

use std::cmp::Ordering;

use sqlx::{Postgres, QueryBuilder};

use super::filter::ListingFilters;
use super::types::{Listing, ListingType, PropertyType};

/// Columns selected for every listing read. Numeric columns are widened to
/// FLOAT8 so they decode straight into `f64`.
pub const LISTING_COLUMNS: &str = "id, name, property_name, type, property_type, address, \
     price::FLOAT8 AS price, rating::FLOAT8 AS rating, description, verified, is_active, \
     is_deleted, amenities, images, email, phone, google_map_link, slug, created_at, \
     updated_at, deleted_at";

/// Newest first, ties broken by id.
pub const LISTING_ORDER: &str = "created_at DESC, id DESC";

/// One condition a listing must satisfy
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    NotDeleted,
    TypeEq(ListingType),
    PropertyTypeEq(PropertyType),
    VerifiedEq(bool),
    PriceMin(f64),
    PriceMax(f64),
    /// Case-insensitive substring of name, address or description
    Search(String),
}

/// Translate filters into predicates. Limit and offset are not predicates.
pub fn predicates(filters: &ListingFilters) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::NotDeleted];

    if let Some(listing_type) = filters.listing_type {
        predicates.push(Predicate::TypeEq(listing_type));
    }
    if let Some(property_type) = filters.property_type {
        predicates.push(Predicate::PropertyTypeEq(property_type));
    }
    if let Some(verified) = filters.verified {
        predicates.push(Predicate::VerifiedEq(verified));
    }
    if let Some(min) = filters.min_price {
        predicates.push(Predicate::PriceMin(min));
    }
    if let Some(max) = filters.max_price {
        predicates.push(Predicate::PriceMax(max));
    }
    if let Some(ref term) = filters.search {
        predicates.push(Predicate::Search(term.clone()));
    }

    predicates
}

impl Predicate {
    /// In-memory evaluation
    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            Predicate::NotDeleted => !listing.is_deleted,
            Predicate::TypeEq(t) => listing.listing_type == *t,
            Predicate::PropertyTypeEq(t) => listing.property_type == *t,
            Predicate::VerifiedEq(v) => listing.verified == *v,
            Predicate::PriceMin(min) => listing.price >= *min,
            Predicate::PriceMax(max) => listing.price <= *max,
            Predicate::Search(term) => {
                let needle = term.to_lowercase();
                let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
                contains(&listing.name)
                    || contains(&listing.address)
                    || listing.description.as_deref().is_some_and(contains)
            },
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Predicate::NotDeleted => {
                qb.push("is_deleted = FALSE");
            },
            Predicate::TypeEq(t) => {
                qb.push("type = ").push_bind(t.as_str());
            },
            Predicate::PropertyTypeEq(t) => {
                qb.push("property_type = ").push_bind(t.as_str());
            },
            Predicate::VerifiedEq(v) => {
                qb.push("verified = ").push_bind(*v);
            },
            Predicate::PriceMin(min) => {
                qb.push("price >= ").push_bind(*min);
            },
            Predicate::PriceMax(max) => {
                qb.push("price <= ").push_bind(*max);
            },
            Predicate::Search(term) => {
                // Backslash is the default LIKE escape character.
                let pattern = format!("%{}%", escape_like(term));
                qb.push("(name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR address ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR description ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            },
        }
    }
}

/// Escape LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Listing order shared by every backend: `created_at DESC, id DESC`.
pub fn newest_first(a: &Listing, b: &Listing) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

fn push_where(qb: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        predicate.push_sql(qb);
    }
}

/// `SELECT COUNT(*)` over the matching rows
pub fn count_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM listings");
    push_where(&mut qb, predicates);
    qb
}

/// One ordered page of matching rows
pub fn page_query(predicates: &[Predicate], limit: i64, offset: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM listings", LISTING_COLUMNS));
    push_where(&mut qb, predicates);
    qb.push(" ORDER BY ")
        .push(LISTING_ORDER)
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    qb
}

/// Apply predicates, ordering and paging to an in-memory collection.
pub fn evaluate<'a, I>(listings: I, filters: &ListingFilters) -> (Vec<Listing>, i64)
where
    I: IntoIterator<Item = &'a Listing>,
{
    let predicates = predicates(filters);
    let mut matching: Vec<&Listing> = listings
        .into_iter()
        .filter(|listing| predicates.iter().all(|p| p.matches(listing)))
        .collect();
    matching.sort_by(|a, b| newest_first(a, b));

    let total = matching.len() as i64;
    let items = matching
        .into_iter()
        .skip(usize::try_from(filters.offset).unwrap_or(0))
        .take(usize::try_from(filters.limit).unwrap_or(0))
        .cloned()
        .collect();

    (items, total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::features::listings::types::NewListing;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn listing(name: &str, price: f64, minutes: i64) -> Listing {
        let new: NewListing = serde_json::from_value(json!({
            "name": name,
            "propertyName": name,
            "type": "PG",
            "propertyType": "Both",
            "address": "MG Road",
            "price": price
        }))
        .unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        new.into_listing(Uuid::new_v4(), base + Duration::minutes(minutes))
    }

    #[test]
    fn test_predicates_order_and_presence() {
        let filters = ListingFilters {
            listing_type: Some(ListingType::Hostel),
            verified: Some(false),
            min_price: Some(100.0),
            search: Some("metro".into()),
            ..ListingFilters::default()
        };
        assert_eq!(
            predicates(&filters),
            vec![
                Predicate::NotDeleted,
                Predicate::TypeEq(ListingType::Hostel),
                Predicate::VerifiedEq(false),
                Predicate::PriceMin(100.0),
                Predicate::Search("metro".into()),
            ]
        );
        assert_eq!(predicates(&ListingFilters::default()), vec![Predicate::NotDeleted]);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_sql_binds_every_value() {
        let filters = ListingFilters {
            property_type: Some(PropertyType::Girls),
            max_price: Some(5000.0),
            search: Some("x".into()),
            ..ListingFilters::default()
        };
        let preds = predicates(&filters);

        let count = count_query(&preds);
        assert_eq!(
            count.sql(),
            "SELECT COUNT(*) FROM listings WHERE is_deleted = FALSE AND property_type = $1 \
             AND price <= $2 AND (name ILIKE $3 OR address ILIKE $4 OR description ILIKE $5)"
        );

        let page = page_query(&preds, 10, 20);
        assert!(page.sql().ends_with("ORDER BY created_at DESC, id DESC LIMIT $6 OFFSET $7"));
        assert!(!page.sql().contains("Girls"));
    }

    #[test]
    fn test_search_matches_case_insensitively() {
        let mut l = listing("Sunset PG", 100.0, 0);
        l.description = Some("Close to the METRO".into());
        assert!(Predicate::Search("sunset".into()).matches(&l));
        assert!(Predicate::Search("metro".into()).matches(&l));
        assert!(Predicate::Search("mg road".into()).matches(&l));
        assert!(!Predicate::Search("beach".into()).matches(&l));

        l.description = None;
        assert!(!Predicate::Search("metro".into()).matches(&l));
    }

    #[test]
    fn test_evaluate_orders_pages_and_counts() {
        let listings: Vec<Listing> = (0..7)
            .map(|i| listing(&format!("Listing {}", i), 100.0 * (i + 1) as f64, i))
            .collect();

        let filters = ListingFilters {
            min_price: Some(200.0),
            limit: 3,
            offset: 0,
            ..ListingFilters::default()
        };
        let (first, total) = evaluate(&listings, &filters);
        assert_eq!(total, 6);
        let names: Vec<_> = first.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Listing 6", "Listing 5", "Listing 4"]);

        let (second, _) = evaluate(&listings, &ListingFilters { offset: 3, ..filters.clone() });
        let names: Vec<_> = second.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Listing 3", "Listing 2", "Listing 1"]);

        let (beyond, total) = evaluate(&listings, &ListingFilters { offset: 10, ..filters });
        assert!(beyond.is_empty());
        assert_eq!(total, 6);
    }

    #[test]
    fn test_soft_deleted_never_match() {
        let mut l = listing("Gone", 100.0, 0);
        l.is_deleted = true;
        let (items, total) = evaluate([&l], &ListingFilters::default());
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_ties_broken_by_id() {
        let a = listing("A", 100.0, 0);
        let mut b = listing("B", 100.0, 0);
        b.created_at = a.created_at;
        let expected_first = if a.id > b.id { "A" } else { "B" };
        let (items, _) = evaluate([&a, &b], &ListingFilters::default());
        assert_eq!(items[0].name, expected_first);
    }
}
