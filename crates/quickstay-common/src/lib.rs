//! QuickStay Common Library
//!
//! Shared plumbing for the QuickStay workspace members:
//!
//! - **Logging**: tracing subscriber setup driven by environment variables
//! - **Env**: lenient environment variable readers used by every config struct
//!
//! # Example
//!
//! ```no_run
//! use quickstay_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod env;
pub mod logging;

pub use logging::{init_logging, LogConfig, LoggingGuard};
