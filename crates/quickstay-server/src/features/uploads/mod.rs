pub mod commands;
pub mod policy;
pub mod routes;

pub use commands::{UploadImagesCommand, UploadImagesError, UploadImagesResponse, UploadedImage};
pub use policy::UploadPolicy;
pub use routes::{uploads_routes, UploadsState};
