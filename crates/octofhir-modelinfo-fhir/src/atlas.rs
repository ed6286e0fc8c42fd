//! Atlas - in-memory index of loaded conformance resources
//!
//! The Atlas is populated once (from decoded package contents) and is then
//! only read: builders borrow it immutably for the duration of a build.
//! Missing lookups return `None`; callers decide whether absence is fatal.

use indexmap::IndexMap;
use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::implementation_guide::ImplementationGuide;
use crate::search_parameter::SearchParameter;
use crate::structure_definition::StructureDefinition;

/// Index of structure definitions, search parameters and implementation guides
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    /// Structure definitions keyed by canonical URL, in load order
    structure_definitions: IndexMap<String, StructureDefinition>,
    /// Resource id to canonical URL
    ids: HashMap<String, String>,
    search_parameters: IndexMap<String, SearchParameter>,
    implementation_guides: IndexMap<String, ImplementationGuide>,
}

impl Atlas {
    /// Create an empty atlas
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structure definition; a later definition with the same URL replaces the earlier one
    pub fn add_structure_definition(&mut self, sd: StructureDefinition) {
        if let Some(id) = &sd.id {
            self.ids.insert(id.clone(), sd.url.clone());
        }
        if self.structure_definitions.contains_key(&sd.url) {
            log::debug!("replacing structure definition {}", sd.url);
        }
        self.structure_definitions.insert(sd.url.clone(), sd);
    }

    /// Add a search parameter
    pub fn add_search_parameter(&mut self, sp: SearchParameter) {
        self.search_parameters.insert(sp.url.clone(), sp);
    }

    /// Add an implementation guide
    pub fn add_implementation_guide(&mut self, ig: ImplementationGuide) {
        self.implementation_guides.insert(ig.url.clone(), ig);
    }

    /// Load one decoded JSON resource
    ///
    /// Bundles are unpacked recursively. Resource types the builder does not
    /// consume are ignored.
    pub fn load_json(&mut self, resource: Value) -> Result<()> {
        let resource_type = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match resource_type.as_str() {
            "StructureDefinition" => {
                let sd = decode::<StructureDefinition>(resource, &resource_type)?;
                self.add_structure_definition(sd);
            }
            "SearchParameter" => {
                let sp = decode::<SearchParameter>(resource, &resource_type)?;
                self.add_search_parameter(sp);
            }
            "ImplementationGuide" => {
                let ig = decode::<ImplementationGuide>(resource, &resource_type)?;
                self.add_implementation_guide(ig);
            }
            "Bundle" => {
                let entries = match resource {
                    Value::Object(mut map) => map.remove("entry"),
                    _ => None,
                };
                if let Some(Value::Array(entries)) = entries {
                    for entry in entries {
                        if let Value::Object(mut entry) = entry {
                            if let Some(inner) = entry.remove("resource") {
                                self.load_json(inner)?;
                            }
                        }
                    }
                }
            }
            other => log::debug!("ignoring resource of type '{other}'"),
        }

        Ok(())
    }

    /// Load every resource in the iterator
    pub fn load_all(&mut self, resources: impl IntoIterator<Item = Value>) -> Result<()> {
        for resource in resources {
            self.load_json(resource)?;
        }
        Ok(())
    }

    /// Look up a structure definition by resource id
    pub fn by_id(&self, id: &str) -> Option<&StructureDefinition> {
        self.ids
            .get(id)
            .and_then(|url| self.structure_definitions.get(url))
    }

    /// Look up a structure definition by canonical URL (a `|version` suffix is ignored)
    pub fn by_url(&self, url: &str) -> Option<&StructureDefinition> {
        let url = url.split('|').next().unwrap_or(url);
        self.structure_definitions.get(url)
    }

    /// All structure definitions, in load order
    pub fn structure_definitions(&self) -> impl Iterator<Item = &StructureDefinition> {
        self.structure_definitions.values()
    }

    /// All search parameters, in load order
    pub fn search_parameters(&self) -> impl Iterator<Item = &SearchParameter> {
        self.search_parameters.values()
    }

    /// All implementation guides, in load order
    pub fn implementation_guides(&self) -> impl Iterator<Item = &ImplementationGuide> {
        self.implementation_guides.values()
    }

    /// Look up an implementation guide by canonical URL
    pub fn implementation_guide(&self, url: &str) -> Option<&ImplementationGuide> {
        self.implementation_guides.get(url)
    }

    pub fn len(&self) -> usize {
        self.structure_definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure_definitions.is_empty()
    }
}

fn decode<T: DeserializeOwned>(resource: Value, resource_type: &str) -> Result<T> {
    let label = resource
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or(resource_type)
        .to_string();
    serde_json::from_value(resource)
        .map_err(|e| ModelInfoError::malformed_definition(label, e.to_string()))
}
