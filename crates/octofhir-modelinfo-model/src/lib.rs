//! CQL ModelInfo data model
//!
//! This crate provides:
//! - The ModelInfo aggregate and its TypeInfo variants
//! - Type specifiers (named, list, interval, choice, deferred content references)
//! - Read-side lookups used by consumers of a compiled model
//! - The serializer boundary

pub mod model_info;
pub mod serialize;

pub use model_info::*;
pub use serialize::*;
