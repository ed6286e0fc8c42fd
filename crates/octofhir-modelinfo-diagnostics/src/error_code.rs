//! ModelInfo error codes following a structured numbering system
//!
//! Error code ranges:
//! - MI0001-MI0099: Resolution errors (type references, content references)
//! - MI0100-MI0199: Structure errors (duplicate names, malformed definitions)
//! - MI0200-MI0299: Configuration errors (settings documents)
//! - MI0300-MI0399: Serialization errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is a resolution error (0001-0099)
    pub const fn is_resolution_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a structure error (0100-0199)
    pub const fn is_structure_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a configuration error (0200-0299)
    pub const fn is_configuration_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Check if this is a serialization error (0300-0399)
    pub const fn is_serialization_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MI{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Resolution errors (0001-0099)
    map.insert(
        1,
        ErrorInfo::new("Unresolvable type reference")
            .with_help("The definition set is missing a dependency; load the package that defines the type"),
    );
    map.insert(2, ErrorInfo::new("Unresolvable content reference"));
    map.insert(
        3,
        ErrorInfo::new("Ambiguous content reference")
            .with_help("Register a content reference override for the target model"),
    );

    // Structure errors (0100-0199)
    map.insert(100, ErrorInfo::new("Duplicate qualified type name"));
    map.insert(101, ErrorInfo::new("Malformed structure definition"));

    // Configuration errors (0200-0299)
    map.insert(200, ErrorInfo::new("Invalid settings document"));

    // Serialization errors (0300-0399)
    map.insert(300, ErrorInfo::new("ModelInfo serialization failed"));

    map
});

// Resolution errors
pub const MI0001: ErrorCode = ErrorCode::new(1);
pub const MI0002: ErrorCode = ErrorCode::new(2);
pub const MI0003: ErrorCode = ErrorCode::new(3);

// Structure errors
pub const MI0100: ErrorCode = ErrorCode::new(100);
pub const MI0101: ErrorCode = ErrorCode::new(101);

// Configuration errors
pub const MI0200: ErrorCode = ErrorCode::new(200);

// Serialization errors
pub const MI0300: ErrorCode = ErrorCode::new(300);
