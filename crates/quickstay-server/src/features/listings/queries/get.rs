//! Get listing by id query

use uuid::Uuid;

use crate::features::listings::repository::{ListingRepository, RepositoryError};
use crate::features::listings::types::Listing;
use crate::features::listings::validation::parse_listing_id;
use crate::features::shared::validation::FieldViolation;

/// Errors that can occur when fetching a listing by id
#[derive(Debug, thiserror::Error)]
pub enum GetListingError {
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("Listing '{0}' not found")]
    NotFound(Uuid),
    #[error("Failed to load listing: {0}")]
    Repository(#[from] RepositoryError),
}

#[tracing::instrument(skip(repo))]
pub async fn handle(repo: &dyn ListingRepository, id: &str) -> Result<Listing, GetListingError> {
    let id = parse_listing_id(id).map_err(GetListingError::Validation)?;

    repo.find_by_id(id)
        .await?
        .ok_or(GetListingError::NotFound(id))
}
