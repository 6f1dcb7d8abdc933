//! Accommodation listings
//!
//! Create, update, fetch (by id or slug) and filtered, paginated listing of
//! listings. Records are soft-deleted only; deleted rows are invisible here.

pub mod commands;
pub mod filter;
pub mod queries;
pub mod query_builder;
pub mod repository;
pub mod routes;
pub mod types;
pub mod validation;

pub use commands::{CreateListingError, UpdateListingError};
pub use filter::{ListingFilters, ListingQueryParams};
pub use queries::{GetListingBySlugError, GetListingError, ListListingsError};
pub use repository::{
    InMemoryListingRepository, ListingRepository, PgListingRepository, SharedListingRepository,
};
pub use routes::listings_routes;
pub use types::{Listing, ListingType, PropertyType};
