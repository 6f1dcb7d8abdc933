//! Shared utilities for feature modules
//!
//! Common functionality used across feature slices:
//!
//! - `validation`: schema-driven payload validation with accumulated violations
//! - `pagination`: limit/offset metadata
//! - `slug`: URL slug derivation

pub mod pagination;
pub mod slug;
pub mod validation;

pub use pagination::{Paginated, PaginationMetadata};
pub use slug::slugify;
pub use validation::{FieldSpec, FieldViolation, Mode, Rule, Schema};
