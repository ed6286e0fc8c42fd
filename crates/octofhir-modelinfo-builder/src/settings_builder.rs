//! Model configuration records derived from implementation guides
//!
//! A side output: each implementation guide in the Atlas yields a
//! configuration record listing its dependencies and profiles with default
//! inclusion flags, for a person to review and adjust.

use octofhir_modelinfo_fhir::{Atlas, ImplementationGuide};
use serde::{Deserialize, Serialize};

use crate::settings::{DEFAULT_PRIMARY_CODE_PATH, primary_code_path};

/// Configuration record of one implementation guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfiguration {
    pub name: String,
    pub version: String,
    /// Namespace for the model's types
    pub namespace: String,
    pub url: String,
    pub patient_class_name: String,
    pub use_native_primitives: bool,
    pub include_metadata: bool,
    pub create_slice_elements: bool,
    pub create_extension_elements: bool,
    pub create_reference_elements: bool,
    pub flatten: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencyConfiguration>,
    #[serde(default)]
    pub profiles: Vec<ProfileConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyConfiguration {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfiguration {
    pub url: String,
    pub title: String,
    /// Resource or data type the profile constrains
    pub type_name: String,
    pub retrievable: bool,
    pub included: bool,
    pub primary_code_path: String,
}

/// Derives one [`ModelConfiguration`] per implementation guide
pub struct SettingsBuilder<'a> {
    atlas: &'a Atlas,
}

impl<'a> SettingsBuilder<'a> {
    pub fn new(atlas: &'a Atlas) -> Self {
        Self { atlas }
    }

    /// Configuration records for every guide in the Atlas, in load order
    pub fn build(&self) -> Vec<ModelConfiguration> {
        self.atlas
            .implementation_guides()
            .map(|ig| self.build_for(ig))
            .collect()
    }

    pub fn build_for(&self, ig: &ImplementationGuide) -> ModelConfiguration {
        let mut profiles = Vec::new();
        for id in ig.structure_definition_ids() {
            let Some(sd) = self.atlas.by_id(id) else {
                log::warn!("profile {id} listed by {} not found", ig.url);
                continue;
            };
            if !sd.is_profile() {
                continue;
            }
            profiles.push(ProfileConfiguration {
                url: sd.url.clone(),
                title: sd.title.clone().unwrap_or_else(|| sd.name.clone()),
                type_name: sd.type_.clone(),
                retrievable: sd.is_resource(),
                included: true,
                primary_code_path: primary_code_path(&sd.type_)
                    .unwrap_or(DEFAULT_PRIMARY_CODE_PATH)
                    .to_string(),
            });
        }

        let patient_class_name = profiles
            .iter()
            .find(|p| p.type_name == "Patient")
            .and_then(|p| self.atlas.by_url(&p.url))
            .map(|sd| sd.name.clone())
            .unwrap_or_else(|| "Patient".to_string());

        ModelConfiguration {
            name: ig.name.clone(),
            version: ig.version.clone().unwrap_or_default(),
            namespace: namespace_for(ig),
            url: ig.url.clone(),
            patient_class_name,
            use_native_primitives: false,
            include_metadata: true,
            create_slice_elements: true,
            create_extension_elements: true,
            create_reference_elements: false,
            flatten: false,
            dependencies: ig
                .depends_on
                .iter()
                .map(|d| DependencyConfiguration {
                    uri: d.uri.clone(),
                    package_id: d.package_id.clone(),
                    version: d.version.clone(),
                })
                .collect(),
            profiles,
        }
    }
}

/// CQL identifier for a guide's types: the guide name, or the package id when
/// the name yields nothing, with separators dropped and segments capitalised
fn namespace_for(ig: &ImplementationGuide) -> String {
    let namespace = identifier(&ig.name);
    if !namespace.is_empty() {
        return namespace;
    }
    ig.package_id.as_deref().map(identifier).unwrap_or_default()
}

fn identifier(text: &str) -> String {
    let mut out: String = text
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default()
        })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
