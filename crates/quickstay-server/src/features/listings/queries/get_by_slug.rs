//! Get listing by slug query
//!
//! Slugs are not unique. When several live listings share one, the most
//! recently created wins.

use crate::features::listings::repository::{ListingRepository, RepositoryError};
use crate::features::listings::types::Listing;

#[derive(Debug, thiserror::Error)]
pub enum GetListingBySlugError {
    #[error("Listing with slug '{0}' not found")]
    NotFound(String),
    #[error("Failed to load listing: {0}")]
    Repository(#[from] RepositoryError),
}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: &dyn ListingRepository,
    slug: &str,
) -> Result<Listing, GetListingBySlugError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(GetListingBySlugError::NotFound(String::new()));
    }

    repo.find_by_slug(slug)
        .await?
        .ok_or_else(|| GetListingBySlugError::NotFound(slug.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::features::listings::commands::create;
    use crate::features::listings::repository::InMemoryListingRepository;
    use serde_json::json;

    async fn create_named(repo: &InMemoryListingRepository, property_name: &str) -> Listing {
        create::handle(
            repo,
            &json!({
                "name": "Any",
                "propertyName": property_name,
                "type": "Hostel",
                "propertyType": "Both",
                "address": "Jayanagar",
                "price": 800
            }),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let repo = InMemoryListingRepository::new();
        let listing = create_named(&repo, "Green Valley Hostel").await;

        let found = handle(&repo, "Green-Valley-HOSTEL").await.unwrap();
        assert_eq!(found.id, listing.id);
    }

    #[tokio::test]
    async fn test_missing_slug() {
        let repo = InMemoryListingRepository::new();
        create_named(&repo, "Green Valley Hostel").await;

        assert!(matches!(
            handle(&repo, "blue-valley").await,
            Err(GetListingBySlugError::NotFound(s)) if s == "blue-valley"
        ));
        assert!(matches!(
            handle(&repo, "  ").await,
            Err(GetListingBySlugError::NotFound(_))
        ));
    }
}
