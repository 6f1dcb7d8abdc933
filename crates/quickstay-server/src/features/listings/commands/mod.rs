pub mod create;
pub mod update;

pub use create::CreateListingError;
pub use update::UpdateListingError;
