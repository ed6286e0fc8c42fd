//! Target models: settings plus the definition filters of each build phase
//!
//! One generic builder serves every target model; a `TargetModel` carries
//! everything that differs between them.

use std::fmt;

use octofhir_modelinfo_fhir::{
    FHIR_STRUCTURE_DEFINITION_BASE, StructureDefinition, StructureDefinitionKind,
};
use octofhir_modelinfo_model::ModelSpecifier;

use crate::settings::{
    ClassInfoSettings, ContextDefinition, ModelInfoSettings, Settings, system_model,
};

/// Predicate selecting the definitions of one build phase
pub type DefinitionFilter = Box<dyn Fn(&StructureDefinition) -> bool + Send + Sync>;

/// Replacement for a content reference the filtered definitions cannot resolve
pub type ContentReferenceOverride = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub const US_CORE_STRUCTURE_DEFINITION_BASE: &str =
    "http://hl7.org/fhir/us/core/StructureDefinition/";
pub const QICORE_STRUCTURE_DEFINITION_BASE: &str =
    "http://hl7.org/fhir/us/qicore/StructureDefinition/";

/// Configuration of one target model
pub struct TargetModel {
    pub settings: Settings,
    primitive_filter: DefinitionFilter,
    complex_type_filter: DefinitionFilter,
    resource_filter: DefinitionFilter,
    content_reference_override: Option<ContentReferenceOverride>,
    helper_library_path: Option<String>,
}

impl fmt::Debug for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetModel")
            .field("settings", &self.settings)
            .field(
                "content_reference_override",
                &self.content_reference_override.is_some(),
            )
            .field("helper_library_path", &self.helper_library_path)
            .finish_non_exhaustive()
    }
}

impl TargetModel {
    /// Target model with the default filters: every primitive, every complex
    /// type, and resource specializations only
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            primitive_filter: Box::new(|_| true),
            complex_type_filter: Box::new(|_| true),
            resource_filter: Box::new(StructureDefinition::is_specialization),
            content_reference_override: None,
            helper_library_path: None,
        }
    }

    pub fn with_primitive_filter(
        mut self,
        filter: impl Fn(&StructureDefinition) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.primitive_filter = Box::new(filter);
        self
    }

    pub fn with_complex_type_filter(
        mut self,
        filter: impl Fn(&StructureDefinition) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.complex_type_filter = Box::new(filter);
        self
    }

    pub fn with_resource_filter(
        mut self,
        filter: impl Fn(&StructureDefinition) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.resource_filter = Box::new(filter);
        self
    }

    pub fn with_content_reference_override(
        mut self,
        replacement: impl Fn(&str) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.content_reference_override = Some(Box::new(replacement));
        self
    }

    pub fn with_helper_library_path(mut self, path: impl Into<String>) -> Self {
        self.helper_library_path = Some(path.into());
        self
    }

    pub fn class_info(&self) -> &ClassInfoSettings {
        &self.settings.class_info
    }

    pub fn model_info(&self) -> &ModelInfoSettings {
        &self.settings.model_info
    }

    pub fn helper_library_path(&self) -> Option<&str> {
        self.helper_library_path.as_deref()
    }

    /// Namespace of the types built by this model
    pub fn namespace(&self) -> &str {
        &self.settings.class_info.model_name
    }

    /// Whether the definition is built as a type of this model
    pub fn includes(&self, sd: &StructureDefinition) -> bool {
        match sd.kind {
            StructureDefinitionKind::PrimitiveType => (self.primitive_filter)(sd),
            StructureDefinitionKind::ComplexType => {
                !sd.is_extension() && (self.complex_type_filter)(sd)
            }
            StructureDefinitionKind::Resource => (self.resource_filter)(sd),
            StructureDefinitionKind::Logical => false,
        }
    }

    /// Replacement reference for one that failed to resolve, if an override is registered
    pub fn override_content_reference(&self, reference: &str) -> Option<String> {
        self.content_reference_override
            .as_ref()
            .and_then(|replace| replace(reference))
    }

    /// Base FHIR model with wrapped primitives and a FHIRHelpers library
    pub fn fhir(version: &str) -> Self {
        let settings = Settings {
            class_info: ClassInfoSettings {
                model_name: "FHIR".to_string(),
                ..ClassInfoSettings::default()
            },
            model_info: ModelInfoSettings {
                name: "FHIR".to_string(),
                version: version.to_string(),
                url: "http://hl7.org/fhir".to_string(),
                target_qualifier: Some("fhir".to_string()),
                target_version: Some(version.to_string()),
                patient_class_name: Some("FHIR.Patient".to_string()),
                patient_birth_date_property_name: Some("birthDate.value".to_string()),
                helper_library_name: Some("FHIRHelpers".to_string()),
                required_models: vec![system_model()],
                contexts: default_contexts("Patient", "Practitioner", "Device", "Encounter"),
            },
        };

        Self::new(settings)
            .with_primitive_filter(is_core)
            .with_complex_type_filter(is_core)
            .with_resource_filter(|sd| is_core(sd) && sd.is_specialization())
            .with_helper_library_path(format!("FHIRHelpers-{version}.cql"))
    }

    /// US Core profile model layered on FHIR
    pub fn us_core(version: &str) -> Self {
        let settings = profile_settings(
            "USCore",
            version,
            "http://hl7.org/fhir/us/core",
            "uscore",
            "USCorePatientProfile",
        );

        Self::new(settings)
            .with_primitive_filter(|_| false)
            .with_complex_type_filter(|sd| sd.url.starts_with(US_CORE_STRUCTURE_DEFINITION_BASE))
            .with_resource_filter(|sd| sd.url.starts_with(US_CORE_STRUCTURE_DEFINITION_BASE))
    }

    /// QI-Core profile model layered on FHIR
    pub fn qicore(version: &str) -> Self {
        let mut settings = profile_settings(
            "QICore",
            version,
            "http://hl7.org/fhir/us/qicore",
            "qicore",
            "QICorePatient",
        );
        settings.class_info.include_metadata = true;
        settings.class_info.create_reference_elements = true;

        Self::new(settings)
            .with_primitive_filter(|_| false)
            .with_complex_type_filter(|sd| sd.url.starts_with(QICORE_STRUCTURE_DEFINITION_BASE))
            .with_resource_filter(|sd| sd.url.starts_with(QICORE_STRUCTURE_DEFINITION_BASE))
    }

    /// QUICK: the FHIR resources over native CQL types, flattened
    pub fn quick(version: &str) -> Self {
        let settings = Settings {
            class_info: ClassInfoSettings {
                model_name: "QUICK".to_string(),
                use_native_primitives: true,
                flatten: true,
                ..ClassInfoSettings::default()
            },
            model_info: ModelInfoSettings {
                name: "QUICK".to_string(),
                version: version.to_string(),
                url: "http://hl7.org/fhir/us/qicore".to_string(),
                target_qualifier: Some("quick".to_string()),
                target_version: Some(version.to_string()),
                patient_class_name: Some("QUICK.Patient".to_string()),
                patient_birth_date_property_name: Some("birthDate".to_string()),
                helper_library_name: None,
                required_models: vec![system_model()],
                contexts: default_contexts("Patient", "Practitioner", "Device", "Encounter"),
            },
        };

        Self::new(settings)
            .with_primitive_filter(is_core)
            .with_complex_type_filter(is_core)
            .with_resource_filter(|sd| is_core(sd) && sd.is_specialization())
    }
}

fn is_core(sd: &StructureDefinition) -> bool {
    sd.url.starts_with(FHIR_STRUCTURE_DEFINITION_BASE)
}

fn fhir_model(version: &str) -> ModelSpecifier {
    ModelSpecifier {
        name: "FHIR".to_string(),
        version: version.to_string(),
        url: Some("http://hl7.org/fhir".to_string()),
    }
}

fn default_contexts(
    patient: &str,
    practitioner: &str,
    device: &str,
    encounter: &str,
) -> Vec<ContextDefinition> {
    vec![
        ContextDefinition::new("Patient", patient, "id").with_birth_date("birthDate"),
        ContextDefinition::new("Practitioner", practitioner, "id"),
        ContextDefinition::new("Device", device, "id"),
        ContextDefinition::new("Encounter", encounter, "id"),
    ]
}

fn profile_settings(
    name: &str,
    version: &str,
    url: &str,
    qualifier: &str,
    patient_class: &str,
) -> Settings {
    Settings {
        class_info: ClassInfoSettings {
            model_name: name.to_string(),
            dependency_namespace: Some("FHIR".to_string()),
            create_slice_elements: true,
            create_extension_elements: true,
            ..ClassInfoSettings::default()
        },
        model_info: ModelInfoSettings {
            name: name.to_string(),
            version: version.to_string(),
            url: url.to_string(),
            target_qualifier: Some(qualifier.to_string()),
            target_version: Some("4.0.1".to_string()),
            patient_class_name: Some(format!("{name}.{patient_class}")),
            patient_birth_date_property_name: Some("birthDate.value".to_string()),
            helper_library_name: None,
            required_models: vec![system_model(), fhir_model("4.0.1")],
            contexts: vec![ContextDefinition::new("Patient", patient_class, "id")
                .with_birth_date("birthDate")],
        },
    }
}
