//! Type specifiers used by ModelInfo elements, search infos and conversions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace of the CQL system types
pub const SYSTEM_NAMESPACE: &str = "System";

/// Reference to a type by qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedTypeSpecifier {
    pub namespace: String,
    pub name: String,
}

impl NamedTypeSpecifier {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// A type in the System namespace
    pub fn system(name: impl Into<String>) -> Self {
        Self::new(SYSTEM_NAMESPACE, name)
    }

    /// Split a qualified name at its first dot
    ///
    /// "FHIR.Observation.ReferenceRange" -> ("FHIR", "Observation.ReferenceRange")
    pub fn parse(qualified: &str) -> Option<Self> {
        let (namespace, name) = qualified.split_once('.')?;
        if namespace.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(namespace, name))
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    pub fn is_system(&self) -> bool {
        self.namespace == SYSTEM_NAMESPACE
    }
}

impl fmt::Display for NamedTypeSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// One alternative of a choice type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceBranch {
    /// Name of the concrete element for this alternative (e.g. "valueString")
    pub name: String,
    pub type_specifier: TypeSpecifier,
}

impl ChoiceBranch {
    pub fn new(name: impl Into<String>, type_specifier: TypeSpecifier) -> Self {
        Self {
            name: name.into(),
            type_specifier,
        }
    }
}

/// Type of an element, search parameter or conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TypeSpecifier {
    /// Reference to a ClassInfo, SimpleTypeInfo or system type by qualified name
    #[serde(rename = "NamedTypeSpecifier")]
    Named(NamedTypeSpecifier),

    #[serde(rename = "ListTypeSpecifier", rename_all = "camelCase")]
    List { element_type: Box<TypeSpecifier> },

    #[serde(rename = "IntervalTypeSpecifier", rename_all = "camelCase")]
    Interval { point_type: Box<TypeSpecifier> },

    #[serde(rename = "ChoiceTypeSpecifier")]
    Choice { choices: Vec<ChoiceBranch> },

    /// Content reference awaiting the fix-up pass
    ///
    /// `target` is the qualified class the path starts from and `path` the
    /// dotted element path below it.
    #[serde(rename = "ContentReference")]
    Deferred {
        reference: String,
        target: String,
        path: String,
    },
}

impl TypeSpecifier {
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(NamedTypeSpecifier::new(namespace, name))
    }

    pub fn system(name: impl Into<String>) -> Self {
        Self::Named(NamedTypeSpecifier::system(name))
    }

    pub fn list(element_type: TypeSpecifier) -> Self {
        Self::List {
            element_type: Box::new(element_type),
        }
    }

    pub fn interval(point_type: TypeSpecifier) -> Self {
        Self::Interval {
            point_type: Box::new(point_type),
        }
    }

    pub fn choice(choices: Vec<ChoiceBranch>) -> Self {
        Self::Choice { choices }
    }

    /// Wrap in a list unless already a list
    pub fn into_list(self) -> Self {
        match self {
            Self::List { .. } => self,
            other => Self::list(other),
        }
    }

    /// Strip one list layer, if present
    pub fn element_type(&self) -> &TypeSpecifier {
        match self {
            Self::List { element_type } => element_type,
            other => other,
        }
    }

    /// Parse the textual forms used in settings tables:
    /// `FHIR.Coding`, `List<FHIR.Coding>`, `Interval<System.DateTime>`
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix("List<").and_then(|t| t.strip_suffix('>')) {
            return Self::parse(inner).map(Self::list);
        }
        if let Some(inner) = text
            .strip_prefix("Interval<")
            .and_then(|t| t.strip_suffix('>'))
        {
            return Self::parse(inner).map(Self::interval);
        }
        NamedTypeSpecifier::parse(text).map(Self::Named)
    }

    pub fn as_named(&self) -> Option<&NamedTypeSpecifier> {
        match self {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }

    /// Whether a content reference is still waiting for the fix-up pass
    pub fn is_deferred(&self) -> bool {
        match self {
            Self::Deferred { .. } => true,
            Self::Named(_) => false,
            Self::List { element_type } => element_type.is_deferred(),
            Self::Interval { point_type } => point_type.is_deferred(),
            Self::Choice { choices } => choices.iter().any(|c| c.type_specifier.is_deferred()),
        }
    }
}

impl fmt::Display for TypeSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => write!(f, "{named}"),
            Self::List { element_type } => write!(f, "List<{element_type}>"),
            Self::Interval { point_type } => write!(f, "Interval<{point_type}>"),
            Self::Choice { choices } => {
                write!(f, "Choice<")?;
                for (i, choice) in choices.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", choice.type_specifier)?;
                }
                write!(f, ">")
            }
            Self::Deferred { reference, .. } => write!(f, "#{reference}"),
        }
    }
}
