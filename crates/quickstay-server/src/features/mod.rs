//! Feature modules implementing the QuickStay API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **listings**: create, update, fetch and search accommodation listings
//! - **uploads**: image uploads to S3-compatible storage
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations
//! - `queries/` - Read operations (listings only)
//! - `routes.rs` - HTTP route definitions
//!
//! Handlers call plain `handle` functions that take their dependencies as
//! trait objects, so every operation can be exercised without a server.

pub mod listings;
pub mod shared;
pub mod uploads;

use axum::Router;

use crate::middleware::auth::ApiAuth;
use crate::storage::SharedObjectStore;
use listings::SharedListingRepository;
use uploads::{UploadPolicy, UploadsState};

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Listing persistence (PostgreSQL or in-memory)
    pub listings: SharedListingRepository,
    /// Image object storage
    pub objects: SharedObjectStore,
    pub uploads: UploadPolicy,
    pub auth: ApiAuth,
}

/// Creates the API router with all feature routes mounted
///
/// - `/listings` - Listing management
/// - `/uploads` - Image uploads
pub fn router(state: FeatureState) -> Router<()> {
    let uploads_state = UploadsState {
        store: state.objects.clone(),
        policy: state.uploads,
    };

    Router::new()
        .nest(
            "/listings",
            listings::listings_routes(state.auth.clone()).with_state(state.listings.clone()),
        )
        .nest(
            "/uploads",
            uploads::uploads_routes(state.uploads).with_state(uploads_state),
        )
}
