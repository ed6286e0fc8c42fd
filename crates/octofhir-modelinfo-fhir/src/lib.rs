//! FHIR conformance resources consumed by the ModelInfo builder
//!
//! This crate provides:
//! - StructureDefinition and ElementDefinition objects
//! - SearchParameter and ImplementationGuide objects
//! - The Atlas, a read-only index of all loaded definitions

pub mod atlas;
pub mod element_definition;
pub mod implementation_guide;
pub mod search_parameter;
pub mod structure_definition;

pub use atlas::*;
pub use element_definition::*;
pub use implementation_guide::*;
pub use search_parameter::*;
pub use structure_definition::*;

/// Canonical URL prefix of the FHIR core structure definitions
pub const FHIR_STRUCTURE_DEFINITION_BASE: &str = "http://hl7.org/fhir/StructureDefinition/";

/// Canonical URL prefix used by FHIRPath system types in element type codes
pub const FHIRPATH_SYSTEM_TYPE_BASE: &str = "http://hl7.org/fhirpath/System.";

/// Extract the type name from a canonical URL
///
/// E.g. "http://hl7.org/fhir/StructureDefinition/Patient" -> "Patient"
pub fn tail(url: &str) -> &str {
    let url = url.split('|').next().unwrap_or(url);
    url.rsplit('/').next().unwrap_or(url)
}
