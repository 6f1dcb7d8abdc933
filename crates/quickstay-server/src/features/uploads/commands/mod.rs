pub mod upload_images;

pub use upload_images::{
    IncomingImage, UploadImagesCommand, UploadImagesError, UploadImagesResponse, UploadedImage,
};
