//! Context infos for the configured evaluation contexts

use octofhir_modelinfo_model::{ContextInfo, NamedTypeSpecifier};

use crate::class_info::ClassInfoSet;
use crate::settings::ContextDefinition;

/// Builds one ContextInfo per configured context whose type was built
pub struct ContextInfoBuilder<'a> {
    namespace: &'a str,
    contexts: &'a [ContextDefinition],
}

impl<'a> ContextInfoBuilder<'a> {
    pub fn new(namespace: &'a str, contexts: &'a [ContextDefinition]) -> Self {
        Self {
            namespace,
            contexts,
        }
    }

    pub fn build(&self, classes: &ClassInfoSet) -> Vec<ContextInfo> {
        self.contexts
            .iter()
            .filter_map(|context| {
                let context_type = NamedTypeSpecifier::new(self.namespace, &context.type_name);
                if !classes.contains(&context_type.qualified_name()) {
                    log::debug!(
                        "no class {context_type} for context {}, skipping",
                        context.name
                    );
                    return None;
                }
                Some(ContextInfo {
                    name: context.name.clone(),
                    key_element: context.key_element.clone(),
                    birth_date_element: context.birth_date_element.clone(),
                    context_type,
                })
            })
            .collect()
    }
}
