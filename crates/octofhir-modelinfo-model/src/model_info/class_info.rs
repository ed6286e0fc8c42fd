//! TypeInfo variants and their members

use serde::{Deserialize, Serialize};

use super::types::{NamedTypeSpecifier, TypeSpecifier};

/// A named type of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeInfo {
    /// Struct-like type with elements
    #[serde(rename = "ClassInfo")]
    Class(ClassInfo),
    /// Alias of a system type
    #[serde(rename = "SimpleTypeInfo")]
    Simple(SimpleTypeInfo),
}

impl TypeInfo {
    pub fn namespace(&self) -> &str {
        match self {
            Self::Class(c) => &c.namespace,
            Self::Simple(s) => &s.namespace,
        }
    }

    /// Unqualified name
    pub fn name(&self) -> &str {
        match self {
            Self::Class(c) => &c.name,
            Self::Simple(s) => &s.name,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    /// Qualified base type name
    pub fn base_type(&self) -> Option<&str> {
        match self {
            Self::Class(c) => c.base_type.as_deref(),
            Self::Simple(s) => Some(&s.base_type),
        }
    }

    pub fn as_class(&self) -> Option<&ClassInfo> {
        match self {
            Self::Class(c) => Some(c),
            Self::Simple(_) => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassInfo> {
        match self {
            Self::Class(c) => Some(c),
            Self::Simple(_) => None,
        }
    }
}

/// Primitive mapped directly onto a system type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTypeInfo {
    pub namespace: String,
    pub name: String,
    /// Qualified system type (e.g. "System.String")
    pub base_type: String,
}

/// Compiled representation of one structure definition or backbone element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub namespace: String,
    /// Unqualified name; nested classes use dotted names ("Observation.ReferenceRange")
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    /// Canonical URL of the source definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub retrievable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_code_path: Option<String>,
    #[serde(default, rename = "element")]
    pub elements: Vec<ClassInfoElement>,
    #[serde(default, rename = "slices", skip_serializing_if = "Vec::is_empty")]
    pub slices: Vec<SliceList>,
    #[serde(default, rename = "search", skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<SearchInfo>,
}

impl ClassInfo {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Every element, slice members after the plain elements
    pub fn all_elements(&self) -> impl Iterator<Item = &ClassInfoElement> {
        self.elements
            .iter()
            .chain(self.slices.iter().flat_map(|s| s.elements.iter()))
    }

    /// Get an element by name, including slice members
    pub fn element(&self, name: &str) -> Option<&ClassInfoElement> {
        self.all_elements().find(|e| e.name == name)
    }

    /// Mutable access to every element, including slice members
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut ClassInfoElement> {
        self.elements
            .iter_mut()
            .chain(self.slices.iter_mut().flat_map(|s| s.elements.iter_mut()))
    }

    /// Search infos registered under `name`
    pub fn search_infos<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SearchInfo> {
        self.search.iter().filter(move |s| s.name == name)
    }
}

/// One property of a ClassInfo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfoElement {
    pub name: String,
    #[serde(rename = "elementTypeSpecifier")]
    pub type_specifier: TypeSpecifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slice: Option<SliceInfo>,
    /// Qualified target types of a Reference element
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<BindingInfo>,
}

impl ClassInfoElement {
    pub fn new(name: impl Into<String>, type_specifier: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            type_specifier,
            slice: None,
            target_types: Vec::new(),
            description: None,
            definition: None,
            comment: None,
            must_support: None,
            binding: None,
        }
    }
}

/// Terminology binding carried as element metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingInfo {
    pub strength: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Slice membership of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceInfo {
    /// Name of the sliced element
    pub base_element: String,
    pub slice_name: String,
    /// Discriminators as `type:path` pairs joined by `,`
    pub discriminator: String,
}

/// Slices of one repeating element, in declaration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceList {
    pub base_element: String,
    pub discriminator: String,
    #[serde(rename = "element")]
    pub elements: Vec<ClassInfoElement>,
}

/// Search parameter exposed on a ClassInfo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInfo {
    pub name: String,
    /// Type-relative path, several paths joined by `|`
    pub path: String,
    pub type_specifier: TypeSpecifier,
}

/// Implicit conversion offered by the generated helper library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionInfo {
    pub from_type: String,
    pub to_type: String,
    pub function_name: String,
}

/// Evaluation context (Patient, Practitioner, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextInfo {
    pub name: String,
    pub key_element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date_element: Option<String>,
    pub context_type: NamedTypeSpecifier,
}

/// Model this model depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpecifier {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
