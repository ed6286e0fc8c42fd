//! Content references
//!
//! During the build an element declared as `#Type.path` gets a deferred
//! specifier naming the class the path starts from. Once every phase has run,
//! `after_build` walks each deferred path through the finished classes and
//! replaces the deferred specifier with the referenced element's type.

use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
use octofhir_modelinfo_fhir::StructureDefinition;
use octofhir_modelinfo_model::{
    ChoiceBranch, ClassInfoElement, NamedTypeSpecifier, TypeInfo, TypeSpecifier,
};

use super::ClassInfoBuilder;

impl ClassInfoBuilder<'_> {
    /// Deferred specifier for a content reference found in `sd`
    pub(super) fn deferred(&self, sd: &StructureDefinition, reference: &str) -> TypeSpecifier {
        let (root, path) = reference.split_once('.').unwrap_or((reference, ""));
        let target = if root == sd.type_ {
            // profiles resolve references into their own type against themselves
            format!("{}.{}", self.target.namespace(), sd.name)
        } else {
            self.lookup(root)
                .map(|def| self.qualify(def).qualified_name())
                .unwrap_or_else(|| format!("{}.{root}", self.target.namespace()))
        };

        TypeSpecifier::Deferred {
            reference: reference.to_string(),
            target,
            path: path.to_string(),
        }
    }

    /// Resolve every deferred content reference
    ///
    /// Returns the number of elements updated. Running the pass again on a
    /// fixed-up set changes nothing and returns zero.
    pub fn after_build(&mut self) -> Result<usize> {
        let pending: Vec<(String, String, TypeSpecifier)> = self
            .classes
            .iter()
            .filter_map(|(name, type_info)| match type_info {
                TypeInfo::Class(class) => Some((name, class)),
                TypeInfo::Simple(_) => None,
            })
            .flat_map(|(name, class)| {
                class
                    .all_elements()
                    .filter(|e| e.type_specifier.is_deferred())
                    .map(move |e| (name.clone(), e.name.clone(), e.type_specifier.clone()))
            })
            .collect();

        let mut resolved = Vec::with_capacity(pending.len());
        for (class_name, element_name, specifier) in pending {
            let element = format!("{class_name}.{element_name}");
            let fixed = self.resolve_specifier(&specifier, &element, &mut Vec::new())?;
            resolved.push((class_name, element_name, specifier, fixed));
        }

        let count = resolved.len();
        for (class_name, element_name, specifier, fixed) in resolved {
            let element = self
                .classes
                .get_class_mut(&class_name)
                .and_then(|class| {
                    class
                        .elements_mut()
                        .find(|e| e.name == element_name && e.type_specifier == specifier)
                });
            if let Some(element) = element {
                element.type_specifier = fixed;
            }
        }

        if count > 0 {
            log::info!(
                "resolved {count} content references for model {}",
                self.target.namespace()
            );
        }
        Ok(count)
    }

    fn resolve_specifier(
        &self,
        specifier: &TypeSpecifier,
        element: &str,
        visiting: &mut Vec<String>,
    ) -> Result<TypeSpecifier> {
        match specifier {
            TypeSpecifier::Named(_) => Ok(specifier.clone()),
            TypeSpecifier::List { element_type } => Ok(TypeSpecifier::list(
                self.resolve_specifier(element_type, element, visiting)?,
            )),
            TypeSpecifier::Interval { point_type } => Ok(TypeSpecifier::interval(
                self.resolve_specifier(point_type, element, visiting)?,
            )),
            TypeSpecifier::Choice { choices } => {
                let choices = choices
                    .iter()
                    .map(|c| {
                        let resolved = self.resolve_specifier(&c.type_specifier, element, visiting)?;
                        Ok(ChoiceBranch::new(c.name.clone(), resolved))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(TypeSpecifier::choice(choices))
            }
            TypeSpecifier::Deferred {
                reference,
                target,
                path,
            } => self.resolve_reference(reference, target, path, element, visiting),
        }
    }

    /// Resolve a content reference from class `target`
    ///
    /// A registered override is consulted whenever the reference cannot be
    /// walked in this model: the target class was filtered out, or an element
    /// on the path is missing from the built classes.
    fn resolve_reference(
        &self,
        reference: &str,
        target: &str,
        path: &str,
        element: &str,
        visiting: &mut Vec<String>,
    ) -> Result<TypeSpecifier> {
        if visiting.iter().any(|r| r == reference) {
            return Err(ModelInfoError::unresolvable_content_reference(reference, element));
        }

        let target_built = self.classes.contains(target);
        if target_built {
            if let Some(resolved) = self.walk(target, path, reference, element, visiting)? {
                return Ok(resolved);
            }
        }

        let Some(replacement) = self.target.override_content_reference(reference) else {
            return Err(if target_built {
                ModelInfoError::unresolvable_content_reference(reference, element)
            } else {
                ModelInfoError::ambiguous_content_reference(reference, element)
            });
        };
        log::debug!("content reference {reference} replaced by {replacement}");

        let (root, rest) = replacement
            .split_once('.')
            .unwrap_or((replacement.as_str(), ""));
        let start = self.class_for_root(root);
        if !self.classes.contains(&start) {
            return Err(ModelInfoError::unresolvable_content_reference(reference, element));
        }
        self.walk(&start, rest, reference, element, visiting)?
            .ok_or_else(|| ModelInfoError::unresolvable_content_reference(reference, element))
    }

    /// Walk `path` from class `start`; the result is the referenced
    /// element's type with any list layer removed, or `None` when an element
    /// on the path is not part of the built classes
    fn walk(
        &self,
        start: &str,
        path: &str,
        reference: &str,
        element: &str,
        visiting: &mut Vec<String>,
    ) -> Result<Option<TypeSpecifier>> {
        visiting.push(reference.to_string());
        let walked = self.walk_segments(start, path, element, visiting);
        visiting.pop();
        walked
    }

    fn walk_segments(
        &self,
        start: &str,
        path: &str,
        element: &str,
        visiting: &mut Vec<String>,
    ) -> Result<Option<TypeSpecifier>> {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let mut current = start.to_string();

        for (i, segment) in segments.iter().enumerate() {
            let Some(found) = self.find_element(&current, segment) else {
                return Ok(None);
            };
            let specifier = if found.type_specifier.is_deferred() {
                self.resolve_specifier(&found.type_specifier, element, visiting)?
            } else {
                found.type_specifier.clone()
            };
            let specifier = specifier.element_type().clone();

            if i + 1 == segments.len() {
                return Ok(Some(specifier));
            }
            match specifier.as_named() {
                Some(named) => current = named.qualified_name(),
                None => return Ok(None),
            }
        }

        // a reference to the type itself
        Ok(NamedTypeSpecifier::parse(&current).map(TypeSpecifier::Named))
    }

    /// Find an element on a class or any of its base classes
    fn find_element(&self, class_name: &str, name: &str) -> Option<&ClassInfoElement> {
        let name = name.strip_suffix("[x]").unwrap_or(name);
        let mut current = self.classes.get_class(class_name)?;
        loop {
            if let Some(element) = current.element(name) {
                return Some(element);
            }
            current = self.classes.get_class(current.base_type.as_deref()?)?;
        }
    }

    /// Qualified class for the root of an overridden reference
    fn class_for_root(&self, root: &str) -> String {
        let own = format!("{}.{root}", self.target.namespace());
        if self.classes.contains(&own) {
            return own;
        }
        self.lookup(root)
            .map(|def| self.qualify(def).qualified_name())
            .unwrap_or(own)
    }
}
