//! ModelInfo builder diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the
//! definition index, the ModelInfo builders and the serializer boundary:
//! structured error codes and the error type built on top of them.

mod error;
mod error_code;

pub use error::*;
pub use error_code::*;

/// Result type for ModelInfo operations
pub type Result<T> = std::result::Result<T, ModelInfoError>;
