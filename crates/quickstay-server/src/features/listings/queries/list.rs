//! List listings query
//!
//! Sanitizes raw query parameters, runs the filtered search and wraps the
//! page with limit/offset metadata.

use crate::features::listings::filter::ListingQueryParams;
use crate::features::listings::repository::{ListingRepository, RepositoryError};
use crate::features::listings::types::Listing;
use crate::features::shared::pagination::{Paginated, PaginationMetadata};
use crate::features::shared::validation::FieldViolation;

/// `{items, pagination}`
pub type ListListingsResponse = Paginated<Listing>;

/// Errors that can occur when listing listings
#[derive(Debug, thiserror::Error)]
pub enum ListListingsError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("Failed to list listings: {0}")]
    Repository(#[from] RepositoryError),
}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: &dyn ListingRepository,
    params: ListingQueryParams,
) -> Result<ListListingsResponse, ListListingsError> {
    let filters = params.sanitize().map_err(ListListingsError::Validation)?;

    let page = repo.search(&filters).await?;

    tracing::debug!(
        returned = page.items.len(),
        total = page.total,
        "Listings retrieved"
    );

    Ok(Paginated::new(
        page.items,
        PaginationMetadata::new(page.total, filters.limit, filters.offset),
    ))
}
