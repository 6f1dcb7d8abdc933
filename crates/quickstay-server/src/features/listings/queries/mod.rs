pub mod get;
pub mod get_by_slug;
pub mod list;

pub use get::GetListingError;
pub use get_by_slug::GetListingBySlugError;
pub use list::{ListListingsError, ListListingsResponse};
