//! JSONiq diagnostics and error handling
//!
//! This crate provides the error taxonomy shared by the type-algebra and
//! item-model crates: user-facing failures are `Err` values, internal
//! invariant violations are panics.

mod error;

pub use error::*;

/// Result type for JSONiq front-end operations
pub type Result<T> = std::result::Result<T, Error>;
