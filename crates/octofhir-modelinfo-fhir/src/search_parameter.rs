//! SearchParameter model

use serde::{Deserialize, Serialize};

/// FHIR SearchParameter resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    pub name: String,
    /// Code used in search URLs (e.g. "birthdate")
    pub code: String,
    /// Resource types this parameter applies to
    #[serde(default)]
    pub base: Vec<String>,
    #[serde(rename = "type")]
    pub type_: SearchParamType,
    /// FHIRPath expression; absent for parameters that are not computable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Target resource types for reference parameters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target: Vec<String>,
}

/// Search parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamType {
    Number,
    Date,
    String,
    Token,
    Reference,
    Composite,
    Quantity,
    Uri,
    Special,
}

impl SearchParameter {
    /// Expression when present and non-blank
    pub fn computable_expression(&self) -> Option<&str> {
        self.expression
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}
