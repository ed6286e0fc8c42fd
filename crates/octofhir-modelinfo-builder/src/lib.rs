//! StructureDefinition to CQL ModelInfo compiler
//!
//! This crate provides:
//! - Settings and the built-in target models (FHIR, US Core, QI-Core, QUICK)
//! - The ClassInfo builder with its content-reference fix-up pass
//! - Search info, context info and helper library generation
//! - The ModelInfo builder orchestrating a complete build
//! - Model configuration records derived from implementation guides
//!
//! # Example
//!
//! ```no_run
//! use octofhir_modelinfo_builder::{ModelInfoBuilder, TargetModel};
//! use octofhir_modelinfo_fhir::Atlas;
//!
//! let atlas = Atlas::new();
//! let target = TargetModel::fhir("4.0.1");
//! let build = ModelInfoBuilder::new(&atlas, &target).build()?;
//! println!("{} types", build.model_info.type_infos.len());
//! # Ok::<(), octofhir_modelinfo_diagnostics::ModelInfoError>(())
//! ```

pub mod class_info;
pub mod context_info;
pub mod helpers;
pub mod model_info_builder;
pub mod search_info;
pub mod settings;
pub mod settings_builder;
pub mod target;

pub use class_info::{ClassInfoBuilder, ClassInfoSet, Phase};
pub use context_info::ContextInfoBuilder;
pub use helpers::{HelperLibrary, HelperLibraryGenerator};
pub use model_info_builder::{ModelBuild, ModelInfoBuilder};
pub use search_info::SearchInfoBuilder;
pub use settings::{ClassInfoSettings, ContextDefinition, ModelInfoSettings, Settings};
pub use settings_builder::{ModelConfiguration, SettingsBuilder};
pub use target::TargetModel;
