//! ModelInfo aggregate describing a compiled data model

pub mod class_info;
pub mod types;

pub use class_info::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// ModelInfo structure describing a data model
///
/// Created once per build and handed to a serializer; not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Model name (e.g., "FHIR")
    pub name: String,
    /// Model version
    pub version: String,
    /// Model URL
    pub url: String,
    /// Target qualifier (namespace used in retrieve paths)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_qualifier: Option<String>,
    /// Version of the underlying FHIR specification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<String>,
    /// Patient class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_class_name: Option<String>,
    /// Patient birth date property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_birth_date_property_name: Option<String>,
    #[serde(default, rename = "requiredModelInfo")]
    pub required_model_infos: Vec<ModelSpecifier>,
    /// Type definitions, in build order
    #[serde(default, rename = "typeInfo")]
    pub type_infos: Vec<TypeInfo>,
    #[serde(default, rename = "conversionInfo")]
    pub conversion_infos: Vec<ConversionInfo>,
    #[serde(default, rename = "contextInfo")]
    pub context_infos: Vec<ContextInfo>,
}

impl ModelInfo {
    /// Create a new ModelInfo
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            url: String::new(),
            target_qualifier: None,
            target_version: None,
            patient_class_name: None,
            patient_birth_date_property_name: None,
            required_model_infos: Vec::new(),
            type_infos: Vec::new(),
            conversion_infos: Vec::new(),
            context_infos: Vec::new(),
        }
    }

    /// Get type info by name, qualified ("FHIR.Patient") or relative to this model ("Patient")
    pub fn get_type(&self, name: &str) -> Option<&TypeInfo> {
        let relative = name
            .strip_prefix(self.name.as_str())
            .and_then(|n| n.strip_prefix('.'));
        self.type_infos.iter().find(|t| {
            (t.namespace() == self.name && relative == Some(t.name()))
                || (t.namespace() == self.name && t.name() == name)
                || t.qualified_name() == name
        })
    }

    /// Get a class by name
    pub fn get_class(&self, name: &str) -> Option<&ClassInfo> {
        self.get_type(name).and_then(TypeInfo::as_class)
    }

    /// Check if model contains type
    pub fn has_type(&self, name: &str) -> bool {
        self.get_type(name).is_some()
    }

    /// Get property, traversing base types if necessary
    pub fn get_property(&self, parent_type: &str, property_name: &str) -> Option<&ClassInfoElement> {
        let mut current = self.get_type(parent_type)?;

        loop {
            if let Some(prop) = current.as_class().and_then(|c| c.element(property_name)) {
                return Some(prop);
            }

            current = self.get_type(current.base_type()?)?;
        }
    }

    /// Check if one type is derived from another (considers inheritance)
    pub fn is_derived_from(&self, child_type: &str, parent_type: &str) -> bool {
        let Some(mut current) = self.get_type(child_type) else {
            return false;
        };
        let Some(parent) = self.get_type(parent_type).map(TypeInfo::qualified_name) else {
            return false;
        };

        loop {
            if current.qualified_name() == parent {
                return true;
            }
            match current.base_type().and_then(|b| self.get_type(b)) {
                Some(base) => current = base,
                None => return false,
            }
        }
    }

    /// Check if a type is retrievable
    pub fn is_retrievable(&self, type_name: &str) -> bool {
        self.get_class(type_name)
            .map(|c| c.retrievable)
            .unwrap_or(false)
    }

    /// Get primary code path for a type
    pub fn get_primary_code_path(&self, type_name: &str) -> Option<&str> {
        self.get_class(type_name)
            .and_then(|c| c.primary_code_path.as_deref())
    }

    /// Get all retrievable types
    pub fn get_retrievable_types(&self) -> Vec<&str> {
        self.type_infos
            .iter()
            .filter_map(TypeInfo::as_class)
            .filter(|c| c.retrievable)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Get the conversion from a type, if the helper library offers one
    pub fn get_conversion(&self, from_type: &str) -> Option<&ConversionInfo> {
        self.conversion_infos.iter().find(|c| c.from_type == from_type)
    }
}
