//! Search info builder
//!
//! Attaches search parameters to already-built classes. Runs strictly after
//! the class build; it only appends to existing classes and never creates or
//! replaces entries.

use octofhir_modelinfo_fhir::{Atlas, SearchParamType, SearchParameter};
use octofhir_modelinfo_model::{ChoiceBranch, SearchInfo, TypeSpecifier};

use crate::class_info::ClassInfoSet;
use crate::settings::ClassInfoSettings;

/// Appends a SearchInfo per computable search parameter and base type
pub struct SearchInfoBuilder<'a> {
    atlas: &'a Atlas,
    settings: &'a ClassInfoSettings,
    classes: &'a mut ClassInfoSet,
}

impl<'a> SearchInfoBuilder<'a> {
    pub fn new(
        atlas: &'a Atlas,
        settings: &'a ClassInfoSettings,
        classes: &'a mut ClassInfoSet,
    ) -> Self {
        Self {
            atlas,
            settings,
            classes,
        }
    }

    /// Attach search infos; returns how many were appended
    pub fn build(&mut self) -> usize {
        let atlas = self.atlas;
        let mut attached = 0;

        for parameter in atlas.search_parameters() {
            if parameter.type_ == SearchParamType::Composite {
                log::debug!("skipping composite search parameter {}", parameter.url);
                continue;
            }
            let Some(expression) = parameter.computable_expression() else {
                log::debug!("skipping search parameter {} without expression", parameter.url);
                continue;
            };

            for base in &parameter.base {
                let Some(path) = base_path(expression, base) else {
                    log::debug!(
                        "search parameter {} has no path for base type {base}",
                        parameter.url
                    );
                    continue;
                };

                let targets: Vec<String> = self
                    .classes
                    .classes_for_source_type(base)
                    .map(str::to_string)
                    .collect();
                if targets.is_empty() {
                    continue;
                }

                let type_specifier = self.search_type(parameter);
                for target in targets {
                    if let Some(class) = self.classes.get_class_mut(&target) {
                        class.search.push(SearchInfo {
                            name: parameter.code.clone(),
                            path: path.clone(),
                            type_specifier: type_specifier.clone(),
                        });
                        attached += 1;
                    }
                }
            }
        }

        log::info!("attached {attached} search infos");
        attached
    }

    fn search_type(&self, parameter: &SearchParameter) -> TypeSpecifier {
        match parameter.type_ {
            SearchParamType::Number => TypeSpecifier::system("Decimal"),
            SearchParamType::Date => TypeSpecifier::system("DateTime"),
            SearchParamType::String | SearchParamType::Uri => TypeSpecifier::system("String"),
            SearchParamType::Token => TypeSpecifier::system("Code"),
            SearchParamType::Quantity => TypeSpecifier::system("Quantity"),
            SearchParamType::Special | SearchParamType::Composite => TypeSpecifier::system("Any"),
            SearchParamType::Reference => match parameter.target.as_slice() {
                [] => TypeSpecifier::named(self.settings.external_namespace(), "Reference"),
                [single] => self.reference_target(single),
                targets => TypeSpecifier::choice(
                    targets
                        .iter()
                        .map(|t| ChoiceBranch::new(t.clone(), self.reference_target(t)))
                        .collect(),
                ),
            },
        }
    }

    /// Class for a referenced resource type: the class of that name in this
    /// model, the only class built from that type, or the dependency type
    fn reference_target(&self, resource_type: &str) -> TypeSpecifier {
        let own = format!("{}.{resource_type}", self.settings.model_name);
        if self.classes.contains(&own) {
            return TypeSpecifier::named(&self.settings.model_name, resource_type);
        }

        let mut candidates = self.classes.classes_for_source_type(resource_type);
        if let (Some(only), None) = (candidates.next(), candidates.next()) {
            if let Some(spec) = TypeSpecifier::parse(only) {
                return spec;
            }
        }
        TypeSpecifier::named(self.settings.external_namespace(), resource_type)
    }
}

/// Paths of `expression` that start at `base`, relative to it and joined by `|`
///
/// `"Patient.name | Practitioner.name"` with base `Patient` gives `name`.
pub fn base_path(expression: &str, base: &str) -> Option<String> {
    let paths: Vec<&str> = expression
        .split('|')
        .filter_map(|segment| {
            let mut segment = segment.trim();
            if let Some(inner) = segment
                .strip_prefix('(')
                .and_then(|s| s.strip_suffix(')'))
            {
                segment = inner.trim();
            }
            let (subject, rest) = segment.split_once('.')?;
            let rest = rest.trim();
            (subject.trim() == base && !rest.is_empty()).then_some(rest)
        })
        .collect();

    if paths.is_empty() {
        None
    } else {
        Some(paths.join("|"))
    }
}
