//! Per-target-model settings
//!
//! Settings are plain values: constructed once per target model (from a
//! preset or a JSON document) and only read by the builders.

use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
use octofhir_modelinfo_model::ModelSpecifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Primitive type code to system type, for FHIR R4
pub const FHIR_PRIMITIVE_TYPE_MAPPINGS: &[(&str, &str)] = &[
    ("base64Binary", "System.String"),
    ("boolean", "System.Boolean"),
    ("canonical", "System.String"),
    ("code", "System.String"),
    ("date", "System.Date"),
    ("dateTime", "System.DateTime"),
    ("decimal", "System.Decimal"),
    ("id", "System.String"),
    ("instant", "System.DateTime"),
    ("integer", "System.Integer"),
    ("integer64", "System.Long"),
    ("markdown", "System.String"),
    ("oid", "System.String"),
    ("positiveInt", "System.Integer"),
    ("string", "System.String"),
    ("time", "System.Time"),
    ("unsignedInt", "System.Integer"),
    ("uri", "System.String"),
    ("url", "System.String"),
    ("uuid", "System.String"),
    ("xhtml", "System.String"),
];

/// Complex type code to CQL type, applied when primitives are native
pub const FHIR_CQL_TYPE_MAPPINGS: &[(&str, &str)] = &[
    ("Age", "System.Quantity"),
    ("CodeableConcept", "System.Concept"),
    ("Coding", "System.Code"),
    ("Count", "System.Quantity"),
    ("Distance", "System.Quantity"),
    ("Duration", "System.Quantity"),
    ("MoneyQuantity", "System.Quantity"),
    ("Period", "Interval<System.DateTime>"),
    ("Quantity", "System.Quantity"),
    ("Range", "Interval<System.Quantity>"),
    ("Ratio", "System.Ratio"),
    ("SimpleQuantity", "System.Quantity"),
];

/// Conventional terminology path per resource type
pub const PRIMARY_CODE_PATHS: &[(&str, &str)] = &[
    ("Account", "type"),
    ("ActivityDefinition", "topic"),
    ("AdverseEvent", "event"),
    ("AllergyIntolerance", "code"),
    ("Appointment", "serviceType"),
    ("Basic", "code"),
    ("BodyStructure", "location"),
    ("CarePlan", "category"),
    ("CareTeam", "category"),
    ("ChargeItem", "code"),
    ("Claim", "type"),
    ("ClinicalImpression", "code"),
    ("Communication", "reasonCode"),
    ("CommunicationRequest", "category"),
    ("Composition", "type"),
    ("Condition", "code"),
    ("Consent", "category"),
    ("Coverage", "type"),
    ("DetectedIssue", "code"),
    ("Device", "type"),
    ("DeviceMetric", "type"),
    ("DeviceRequest", "code"),
    ("DeviceUseStatement", "device.code"),
    ("DiagnosticReport", "code"),
    ("Encounter", "type"),
    ("EpisodeOfCare", "type"),
    ("ExplanationOfBenefit", "type"),
    ("FamilyMemberHistory", "relationship"),
    ("Flag", "code"),
    ("Goal", "category"),
    ("GuidanceResponse", "module"),
    ("HealthcareService", "type"),
    ("ImagingStudy", "procedureCode"),
    ("Immunization", "vaccineCode"),
    ("ImmunizationEvaluation", "vaccineCode"),
    ("ImmunizationRecommendation", "recommendation.vaccineCode"),
    ("Location", "type"),
    ("Measure", "topic"),
    ("Medication", "code"),
    ("MedicationAdministration", "medication"),
    ("MedicationDispense", "medication"),
    ("MedicationRequest", "medication"),
    ("MedicationStatement", "medication"),
    ("MessageDefinition", "event"),
    ("Observation", "code"),
    ("OperationOutcome", "issue.code"),
    ("PlanDefinition", "topic"),
    ("Procedure", "code"),
    ("Questionnaire", "code"),
    ("QuestionnaireResponse", "questionnaire"),
    ("RelatedPerson", "relationship"),
    ("RiskAssessment", "code"),
    ("ServiceRequest", "code"),
    ("Specimen", "type"),
    ("Substance", "code"),
    ("SupplyDelivery", "type"),
    ("SupplyRequest", "category"),
    ("Task", "code"),
];

/// Fallback primary code path for resource types missing from the table
pub const DEFAULT_PRIMARY_CODE_PATH: &str = "code";

/// Primary code path for a resource type, if the type has a conventional one
pub fn primary_code_path(resource_type: &str) -> Option<&'static str> {
    PRIMARY_CODE_PATHS
        .iter()
        .find(|(t, _)| *t == resource_type)
        .map(|(_, p)| *p)
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Settings steering how definitions become ClassInfos
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassInfoSettings {
    /// Namespace of the types built for this model
    pub model_name: String,
    /// Namespace of types referenced from a base model rather than built here
    pub dependency_namespace: Option<String>,
    /// Primitive type code to qualified system type
    pub primitive_type_mappings: BTreeMap<String, String>,
    /// Type code to CQL type specifier text, used with native primitives
    pub cql_type_mappings: BTreeMap<String, String>,
    /// Resource type to primary code path
    pub primary_code_paths: BTreeMap<String, String>,
    pub use_native_primitives: bool,
    pub include_metadata: bool,
    pub create_slice_elements: bool,
    pub create_extension_elements: bool,
    pub create_reference_elements: bool,
    pub flatten: bool,
}

impl Default for ClassInfoSettings {
    fn default() -> Self {
        Self {
            model_name: "FHIR".to_string(),
            dependency_namespace: None,
            primitive_type_mappings: table(FHIR_PRIMITIVE_TYPE_MAPPINGS),
            cql_type_mappings: table(FHIR_CQL_TYPE_MAPPINGS),
            primary_code_paths: table(PRIMARY_CODE_PATHS),
            use_native_primitives: false,
            include_metadata: false,
            create_slice_elements: false,
            create_extension_elements: false,
            create_reference_elements: false,
            flatten: false,
        }
    }
}

impl ClassInfoSettings {
    /// Namespace used for types that are not built by this model
    pub fn external_namespace(&self) -> &str {
        self.dependency_namespace
            .as_deref()
            .unwrap_or(&self.model_name)
    }
}

/// Evaluation context the model offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextDefinition {
    pub name: String,
    /// Unqualified class name of the context type
    pub type_name: String,
    pub key_element: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date_element: Option<String>,
}

impl ContextDefinition {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        key_element: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            key_element: key_element.into(),
            birth_date_element: None,
        }
    }

    pub fn with_birth_date(mut self, element: impl Into<String>) -> Self {
        self.birth_date_element = Some(element.into());
        self
    }
}

/// Settings describing the ModelInfo document itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelInfoSettings {
    pub name: String,
    pub version: String,
    pub url: String,
    pub target_qualifier: Option<String>,
    pub target_version: Option<String>,
    /// Qualified name of the patient class (`FHIR.Patient`)
    pub patient_class_name: Option<String>,
    pub patient_birth_date_property_name: Option<String>,
    /// Name of the generated helper library; no library is generated when absent
    pub helper_library_name: Option<String>,
    pub required_models: Vec<ModelSpecifier>,
    pub contexts: Vec<ContextDefinition>,
}

/// Complete settings of one target model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub class_info: ClassInfoSettings,
    pub model_info: ModelInfoSettings,
}

impl Settings {
    /// Load settings from a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| ModelInfoError::invalid_settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.class_info.model_name.is_empty() {
            return Err(ModelInfoError::invalid_settings("model name must not be empty"));
        }
        if self.model_info.name.is_empty() {
            return Err(ModelInfoError::invalid_settings("ModelInfo name must not be empty"));
        }
        let mappings = self
            .class_info
            .primitive_type_mappings
            .iter()
            .chain(self.class_info.cql_type_mappings.iter());
        for (code, target) in mappings {
            if octofhir_modelinfo_model::TypeSpecifier::parse(target).is_none() {
                return Err(ModelInfoError::invalid_settings(format!(
                    "mapping for '{code}' has an invalid target type '{target}'"
                )));
            }
        }
        Ok(())
    }
}

/// The System model every ModelInfo depends on
pub fn system_model() -> ModelSpecifier {
    ModelSpecifier {
        name: "System".to_string(),
        version: "1.0.0".to_string(),
        url: Some("urn:hl7-org:elm-types:r1".to_string()),
    }
}
