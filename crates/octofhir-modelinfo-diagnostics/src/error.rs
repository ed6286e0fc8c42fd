//! ModelInfo error types

use crate::{ErrorCode, MI0001, MI0002, MI0003, MI0100, MI0101, MI0200, MI0300};
use thiserror::Error;

/// Main ModelInfo builder error type
///
/// Every failure is fatal for the model being built: the builder works on a
/// fixed snapshot of definitions, so nothing is retried or masked.
#[derive(Debug, Clone, Error)]
pub enum ModelInfoError {
    /// A type or content reference could not be resolved
    #[error("{code}: {message}")]
    Resolution {
        code: ErrorCode,
        message: String,
        /// Path of the element holding the reference
        element: Option<String>,
    },

    /// The definition set cannot be compiled into a consistent model
    #[error("{code}: {message}")]
    Structure {
        code: ErrorCode,
        message: String,
        /// Canonical URL or name of the offending definition
        definition: Option<String>,
    },

    /// Settings could not be loaded
    #[error("{code}: {message}")]
    Configuration { code: ErrorCode, message: String },

    /// The finished model could not be written
    #[error("{code}: {message}")]
    Serialization { code: ErrorCode, message: String },
}

impl ModelInfoError {
    /// An element declares a type that no loaded definition provides
    pub fn unresolvable_type(type_code: &str, element: impl Into<String>) -> Self {
        let element = element.into();
        Self::Resolution {
            code: MI0001,
            message: format!("cannot resolve type '{type_code}' declared by element '{element}'"),
            element: Some(element),
        }
    }

    /// A content reference points at an element that does not exist
    pub fn unresolvable_content_reference(reference: &str, element: impl Into<String>) -> Self {
        let element = element.into();
        Self::Resolution {
            code: MI0002,
            message: format!(
                "cannot resolve content reference '{reference}' used by element '{element}'"
            ),
            element: Some(element),
        }
    }

    /// A content reference targets a type outside this model and no override is registered
    pub fn ambiguous_content_reference(reference: &str, element: impl Into<String>) -> Self {
        let element = element.into();
        Self::Resolution {
            code: MI0003,
            message: format!(
                "content reference '{reference}' used by element '{element}' targets a type that is not part of this model"
            ),
            element: Some(element),
        }
    }

    /// Two definitions produce the same qualified name
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::Structure {
            code: MI0100,
            message: format!("duplicate qualified type name '{name}'"),
            definition: Some(name),
        }
    }

    /// A definition lacks the structure the builder needs
    pub fn malformed_definition(definition: impl Into<String>, message: impl Into<String>) -> Self {
        let definition = definition.into();
        Self::Structure {
            code: MI0101,
            message: format!("{definition}: {}", message.into()),
            definition: Some(definition),
        }
    }

    /// Create a configuration error
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::Configuration {
            code: MI0200,
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: MI0300,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Resolution { code, .. } => *code,
            Self::Structure { code, .. } => *code,
            Self::Configuration { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// Path of the element the error refers to, if any
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::Resolution { element, .. } => element.as_deref(),
            _ => None,
        }
    }
}
