//! StructureDefinition to CQL ModelInfo compiler
//!
//! This crate re-exports the workspace crates:
//! - Loading FHIR conformance resources into an [`Atlas`]
//! - Compiling them into a [`ModelInfo`] for a [`TargetModel`]
//! - Error codes and the serializer boundary
//!
//! # Example
//!
//! ```no_run
//! use octofhir_modelinfo::{Atlas, JsonSerializer, ModelInfoBuilder, ModelInfoSerializer, TargetModel};
//!
//! let mut atlas = Atlas::new();
//! atlas.load_json(serde_json::json!({ "resourceType": "Bundle", "entry": [] }))?;
//!
//! let target = TargetModel::fhir("4.0.1");
//! let build = ModelInfoBuilder::new(&atlas, &target).build()?;
//! let json = JsonSerializer::pretty().serialize(&build.model_info)?;
//! # Ok::<(), octofhir_modelinfo::ModelInfoError>(())
//! ```

// Re-export all public APIs from internal crates
pub use octofhir_modelinfo_builder as builder;
pub use octofhir_modelinfo_diagnostics as diagnostics;
pub use octofhir_modelinfo_fhir as fhir;
pub use octofhir_modelinfo_model as model;

// Convenience re-exports
pub use octofhir_modelinfo_builder::{
    HelperLibrary, ModelBuild, ModelConfiguration, ModelInfoBuilder, Settings, SettingsBuilder,
    TargetModel,
};
pub use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
pub use octofhir_modelinfo_fhir::Atlas;
pub use octofhir_modelinfo_model::{JsonSerializer, ModelInfo, ModelInfoSerializer};
