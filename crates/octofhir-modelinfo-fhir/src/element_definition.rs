//! ElementDefinition model - one node of a StructureDefinition element tree

use serde::{Deserialize, Serialize};

/// FHIR ElementDefinition
///
/// The dotted `path` encodes nesting depth; `id` additionally carries slice
/// names (`Observation.category:VSCat`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice_name: Option<String>,

    // Documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    // Cardinality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Maximum cardinality, a number or "*"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<ElementBase>,

    // Type constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<ElementBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slicing: Option<Slicing>,
}

/// Declared type of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    /// Type code (e.g. "string", "CodeableConcept", "Reference")
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_profile: Vec<String>,
}

/// Where an element was originally defined
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElementBase {
    pub path: String,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<String>,
}

/// Terminology binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBinding {
    pub strength: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_set: Option<String>,
}

/// Slicing definition on a repeating element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Slicing {
    #[serde(default)]
    pub discriminator: Vec<Discriminator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
}

/// Slice discriminator (e.g. `pattern` on `coding`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Discriminator {
    #[serde(rename = "type")]
    pub type_: String,
    pub path: String,
}

impl Slicing {
    /// Discriminators rendered as `type:path` pairs joined by `,`
    pub fn discriminator_description(&self) -> String {
        self.discriminator
            .iter()
            .map(|d| format!("{}:{}", d.type_, d.path))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl ElementDefinition {
    /// Identity of the element within its snapshot: `id` when present, else `path`
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.path)
    }

    /// Last path segment (e.g. "value[x]")
    pub fn name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Last path segment without the choice suffix (e.g. "value")
    pub fn base_name(&self) -> &str {
        let name = self.name();
        name.strip_suffix("[x]").unwrap_or(name)
    }

    /// Number of path segments
    pub fn depth(&self) -> usize {
        self.path.split('.').count()
    }

    /// Polymorphic element: "[x]" suffix or more than one declared type
    pub fn is_choice(&self) -> bool {
        self.path.ends_with("[x]") || self.types.len() > 1
    }

    /// Maximum cardinality greater than one
    pub fn is_repeating(&self) -> bool {
        match self.max.as_deref() {
            Some("*") => true,
            Some(n) => n.parse::<u32>().map(|n| n > 1).unwrap_or(false),
            None => false,
        }
    }

    /// Maximum cardinality of zero
    pub fn is_prohibited(&self) -> bool {
        self.max.as_deref() == Some("0")
    }

    /// Path portion of the content reference (`#Observation.referenceRange`
    /// or `http://...#Observation.referenceRange` yields `Observation.referenceRange`)
    pub fn content_reference_path(&self) -> Option<&str> {
        self.content_reference
            .as_deref()
            .map(|r| r.rsplit_once('#').map(|(_, p)| p).unwrap_or(r))
    }

    /// Whether the element was introduced by a type other than `type_name`
    pub fn is_inherited(&self, type_name: &str) -> bool {
        self.base
            .as_ref()
            .and_then(|b| b.path.split('.').next())
            .is_some_and(|owner| owner != type_name)
    }

    /// Whether the element is an extension or modifier extension slot
    pub fn is_extension_slot(&self) -> bool {
        matches!(self.name(), "extension" | "modifierExtension")
    }
}
