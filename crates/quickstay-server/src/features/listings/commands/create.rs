//! Create listing command
//!
//! Validates a raw JSON payload against the listing schema, assigns an id,
//! slug and timestamps, and stores the result.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::features::listings::repository::{ListingRepository, RepositoryError};
use crate::features::listings::types::Listing;
use crate::features::listings::validation::validate_new_listing;
use crate::features::shared::validation::FieldViolation;

/// Errors that can occur when creating a listing
#[derive(Debug, thiserror::Error)]
pub enum CreateListingError {
    /// One or more fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    /// The repository rejected the insert
    #[error("Failed to create listing: {0}")]
    Repository(#[from] RepositoryError),
}

/// Handles the create listing command
///
/// # Errors
///
/// - `Validation` - the payload is not an object, misses required fields or
///   breaks a field rule; every violation is reported
/// - `Repository` - the insert failed
#[tracing::instrument(skip(repo, payload))]
pub async fn handle(
    repo: &dyn ListingRepository,
    payload: &Value,
) -> Result<Listing, CreateListingError> {
    let new_listing = validate_new_listing(payload).map_err(CreateListingError::Validation)?;

    let listing = new_listing.into_listing(Uuid::new_v4(), Utc::now());
    let stored = repo.insert(&listing).await?;

    tracing::info!(listing_id = %stored.id, slug = %stored.slug, "Listing created");

    Ok(stored)
}
