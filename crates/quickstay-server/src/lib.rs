//! QuickStay Server Library
//!
//! HTTP API for managing accommodation listings (PGs, rentals, hostels and
//! co-living spaces) and the images attached to them.
//!
//! # Overview
//!
//! - **Listings**: create, partially update, fetch by id or slug, and list
//!   with filters, search and offset pagination
//! - **Uploads**: multipart image upload to S3-compatible storage returning
//!   public URLs
//! - **Persistence**: PostgreSQL through SQLx, behind a repository trait with
//!   an in-memory implementation for tests and local development
//!
//! # Architecture
//!
//! Features are vertical slices under [`features`]. Each slice keeps its
//! write operations in `commands/`, its reads in `queries/` and its HTTP
//! wiring in `routes.rs`. Handlers receive their dependencies through router
//! state, never through globals.
//!
//! Every response, success or failure, uses the envelope in
//! [`api::response`]:
//!
//! ```json
//! { "success": true, "message": "Listing created successfully", "data": { } }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use quickstay_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod storage;

pub use error::{AppError, ErrorDetail};
