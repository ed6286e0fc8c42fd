//! ModelInfo serialization
//!
//! Writing the document to storage belongs to the caller; this module only
//! turns a ModelInfo into text and back.

use std::io::Write;

use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};

use crate::model_info::ModelInfo;

/// Trait for ModelInfo serializers
pub trait ModelInfoSerializer {
    /// Serialize a model to a string
    fn serialize(&self, model: &ModelInfo) -> Result<String>;

    /// Serialize a model to a writer
    fn serialize_to_writer<W: Write>(&self, model: &ModelInfo, mut writer: W) -> Result<()> {
        let text = self.serialize(model)?;
        writer
            .write_all(text.as_bytes())
            .map_err(|e| ModelInfoError::serialization(e.to_string()))
    }

    /// Deserialize a model from a string
    fn deserialize(&self, input: &str) -> Result<ModelInfo>;
}

/// JSON serializer for ModelInfo
#[derive(Debug, Default, Clone)]
pub struct JsonSerializer {
    /// Whether to produce pretty-printed output
    pub pretty: bool,
}

impl JsonSerializer {
    /// Create a new JSON serializer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new JSON serializer with pretty-printing enabled
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ModelInfoSerializer for JsonSerializer {
    fn serialize(&self, model: &ModelInfo) -> Result<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(model)
        } else {
            serde_json::to_string(model)
        };
        result.map_err(|e| ModelInfoError::serialization(e.to_string()))
    }

    fn deserialize(&self, input: &str) -> Result<ModelInfo> {
        serde_json::from_str(input).map_err(|e| ModelInfoError::serialization(e.to_string()))
    }
}
