//! ImplementationGuide model (the parts a model configuration needs)

use serde::{Deserialize, Serialize};

/// FHIR ImplementationGuide resource
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationGuide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default)]
    pub fhir_version: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<DependsOn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<GuideDefinition>,
}

/// Another guide this guide depends on
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependsOn {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Definition section listing the guide's resources
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GuideDefinition {
    #[serde(default)]
    pub resource: Vec<GuideResource>,
}

/// One resource declared by the guide
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideResource {
    pub reference: ResourceReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_canonical: Option<String>,
}

/// Literal resource reference (e.g. "StructureDefinition/us-core-patient")
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl GuideResource {
    /// Whether the resource is an example instance rather than a conformance resource
    pub fn is_example(&self) -> bool {
        self.example_boolean.unwrap_or(false) || self.example_canonical.is_some()
    }

    /// Id of the referenced StructureDefinition, if this entry references one
    pub fn structure_definition_id(&self) -> Option<&str> {
        self.reference
            .reference
            .as_deref()
            .and_then(|r| r.strip_prefix("StructureDefinition/"))
    }
}

impl ImplementationGuide {
    /// Ids of the non-example StructureDefinitions declared by the guide, in declaration order
    pub fn structure_definition_ids(&self) -> impl Iterator<Item = &str> {
        self.definition
            .iter()
            .flat_map(|d| d.resource.iter())
            .filter(|r| !r.is_example())
            .filter_map(GuideResource::structure_definition_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structure_definition_ids() {
        let json = r#"{
            "url": "http://hl7.org/fhir/us/core/ImplementationGuide/hl7.fhir.us.core",
            "name": "USCore",
            "version": "6.1.0",
            "packageId": "hl7.fhir.us.core",
            "fhirVersion": ["4.0.1"],
            "dependsOn": [{ "uri": "http://hl7.org/fhir/uv/ips", "packageId": "hl7.fhir.uv.ips", "version": "1.1.0" }],
            "definition": {
                "resource": [
                    { "reference": { "reference": "StructureDefinition/us-core-patient" }, "exampleBoolean": false },
                    { "reference": { "reference": "Patient/example" }, "exampleBoolean": true },
                    { "reference": { "reference": "ValueSet/us-core-race" } },
                    { "reference": { "reference": "StructureDefinition/us-core-condition" } },
                    { "reference": { "reference": "StructureDefinition/us-core-example" }, "exampleCanonical": "http://x" }
                ]
            }
        }"#;

        let ig: ImplementationGuide = serde_json::from_str(json).unwrap();
        assert_eq!(
            ig.structure_definition_ids().collect::<Vec<_>>(),
            vec!["us-core-patient", "us-core-condition"]
        );
        assert_eq!(ig.depends_on[0].package_id.as_deref(), Some("hl7.fhir.uv.ips"));
    }
}
