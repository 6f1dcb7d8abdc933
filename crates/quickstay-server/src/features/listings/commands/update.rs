//! Update listing command
//!
//! Partially updates an existing listing. Only the fields present in the
//! payload change; explicit `null` clears a nullable field. `updatedAt` is
//! bumped even when the payload carries no recognized fields.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::features::listings::repository::{ListingRepository, RepositoryError};
use crate::features::listings::types::Listing;
use crate::features::listings::validation::{parse_listing_id, validate_patch};
use crate::features::shared::validation::FieldViolation;

/// Errors that can occur when updating a listing
#[derive(Debug, thiserror::Error)]
pub enum UpdateListingError {
    /// The id or one or more payload fields failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    /// No live listing has this id
    #[error("Listing '{0}' not found")]
    NotFound(Uuid),
    #[error("Failed to update listing: {0}")]
    Repository(#[from] RepositoryError),
}

/// Handles the update listing command
///
/// The id is checked before the payload; a malformed id never reaches the
/// repository.
#[tracing::instrument(skip(repo, payload))]
pub async fn handle(
    repo: &dyn ListingRepository,
    id: &str,
    payload: &Value,
) -> Result<Listing, UpdateListingError> {
    let id = parse_listing_id(id).map_err(UpdateListingError::Validation)?;
    let patch = validate_patch(payload).map_err(UpdateListingError::Validation)?;

    let mut listing = repo
        .find_by_id(id)
        .await?
        .ok_or(UpdateListingError::NotFound(id))?;

    patch.apply_to(&mut listing);
    listing.updated_at = Utc::now();

    let updated = repo
        .update(&listing)
        .await?
        .ok_or(UpdateListingError::NotFound(id))?;

    tracing::info!(listing_id = %updated.id, "Listing updated");

    Ok(updated)
}
