//! StructureDefinition model - resources, data types, primitives, profiles and extensions

use serde::{Deserialize, Serialize};

use crate::element_definition::ElementDefinition;

/// List of element definitions (snapshot or differential)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ElementList {
    #[serde(default)]
    pub element: Vec<ElementDefinition>,
}

/// FHIR StructureDefinition resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: StructureDefinitionKind,
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
    /// Type constrained or defined by this structure (e.g. "Observation")
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Derivation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<ElementList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differential: Option<ElementList>,
}

/// Derivation type (constraint or specialization)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Derivation {
    /// Profile or extension layered on an existing type
    Constraint,
    /// New type: resource, data type or logical model
    Specialization,
}

/// StructureDefinition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureDefinitionKind {
    PrimitiveType,
    ComplexType,
    Resource,
    Logical,
}

impl StructureDefinition {
    /// Snapshot elements, or an empty slice when no snapshot was generated
    pub fn elements(&self) -> &[ElementDefinition] {
        self.snapshot
            .as_ref()
            .map(|s| s.element.as_slice())
            .unwrap_or(&[])
    }

    /// The root element (path equal to the type name)
    pub fn root_element(&self) -> Option<&ElementDefinition> {
        self.elements().first().filter(|e| !e.path.contains('.'))
    }

    /// Determine if this is a primitive data type
    pub fn is_primitive(&self) -> bool {
        self.kind == StructureDefinitionKind::PrimitiveType
    }

    /// Determine if this is a complex data type
    pub fn is_complex_type(&self) -> bool {
        self.kind == StructureDefinitionKind::ComplexType
    }

    /// Determine if this is a resource (base resource or resource profile)
    pub fn is_resource(&self) -> bool {
        self.kind == StructureDefinitionKind::Resource
    }

    /// Determine if this defines a new type rather than constraining one
    ///
    /// Definitions without a derivation (Base, Element, Resource) are roots
    /// of the type hierarchy and count as specializations.
    pub fn is_specialization(&self) -> bool {
        !matches!(self.derivation, Some(Derivation::Constraint))
    }

    /// Determine if this is an extension definition
    pub fn is_extension(&self) -> bool {
        self.type_ == "Extension" && matches!(self.derivation, Some(Derivation::Constraint))
    }

    /// Determine if this is a profile (a constraint that is not an extension)
    pub fn is_profile(&self) -> bool {
        matches!(self.derivation, Some(Derivation::Constraint)) && !self.is_extension()
    }

    /// Name of the base type, taken from the base definition URL
    pub fn base_type_name(&self) -> Option<&str> {
        self.base_definition.as_deref().map(crate::tail)
    }
}
