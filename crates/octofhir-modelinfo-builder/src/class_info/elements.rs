//! Element walk: turns the children of one element into ClassInfo elements

use indexmap::IndexMap;
use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
use octofhir_modelinfo_fhir::{
    ElementDefinition, FHIR_STRUCTURE_DEFINITION_BASE, FHIRPATH_SYSTEM_TYPE_BASE, Slicing,
    StructureDefinition, TypeRef, tail,
};
use octofhir_modelinfo_model::{
    BindingInfo, ChoiceBranch, ClassInfo, ClassInfoElement, NamedTypeSpecifier, SliceInfo,
    SliceList, TypeSpecifier,
};

use super::{ClassInfoBuilder, parse_mapping};

impl ClassInfoBuilder<'_> {
    /// Build the class whose elements are the direct children of `parent_key`
    ///
    /// Nested (backbone) classes found on the way are appended to `nested`,
    /// outer classes before the classes nested in them.
    pub(super) fn build_class(
        &self,
        sd: &StructureDefinition,
        class_name: &str,
        parent_key: &str,
        nested: &mut Vec<ClassInfo>,
    ) -> Result<ClassInfo> {
        let settings = self.target.class_info();
        let elements = sd.elements();
        let mut class = ClassInfo::new(self.target.namespace(), class_name);
        let mut slices: IndexMap<String, SliceList> = IndexMap::new();

        for child in direct_children(elements, parent_key) {
            if child.is_prohibited() {
                continue;
            }

            if let Some(slice_name) = child.slice_name.as_deref() {
                // type slices of a choice only narrow the choice
                if child.path.ends_with("[x]") {
                    continue;
                }
                if child.is_extension_slot() {
                    if settings.create_extension_elements {
                        let element = self.build_extension_element(child, slice_name)?;
                        class.elements.push(element);
                    }
                    continue;
                }

                let mut element = self.build_element(sd, class_name, child, slice_name, nested)?;
                if !settings.create_slice_elements {
                    class.elements.push(element);
                    continue;
                }

                let base_element = child.base_name().to_string();
                let discriminator = slicing_for(elements, parent_key, child)
                    .map(Slicing::discriminator_description)
                    .unwrap_or_default();
                element.slice = Some(SliceInfo {
                    base_element: base_element.clone(),
                    slice_name: slice_name.to_string(),
                    discriminator: discriminator.clone(),
                });
                slices
                    .entry(base_element.clone())
                    .or_insert_with(|| SliceList {
                        base_element,
                        discriminator,
                        elements: Vec::new(),
                    })
                    .elements
                    .push(element);
                continue;
            }

            if !settings.flatten && child.is_inherited(&sd.type_) {
                continue;
            }

            let element = self.build_element(sd, class_name, child, child.base_name(), nested)?;
            class.elements.push(element);
        }

        class.slices = slices.into_values().collect();
        Ok(class)
    }

    fn build_element(
        &self,
        sd: &StructureDefinition,
        owner: &str,
        child: &ElementDefinition,
        name: &str,
        nested: &mut Vec<ClassInfo>,
    ) -> Result<ClassInfoElement> {
        let settings = self.target.class_info();
        let mut type_specifier = self.element_type(sd, owner, child, name, nested)?;
        if child.is_repeating() {
            type_specifier = type_specifier.into_list();
        }

        let mut element = ClassInfoElement::new(name, type_specifier);
        if settings.create_reference_elements {
            element.target_types = self.reference_targets(child);
        }
        if settings.include_metadata {
            apply_element_metadata(&mut element, child);
        }
        Ok(element)
    }

    fn element_type(
        &self,
        sd: &StructureDefinition,
        owner: &str,
        child: &ElementDefinition,
        name: &str,
        nested: &mut Vec<ClassInfo>,
    ) -> Result<TypeSpecifier> {
        if let Some(reference) = child.content_reference_path() {
            return Ok(self.deferred(sd, reference));
        }

        if opens_nested_class(sd.elements(), child) {
            return self.build_nested_class(sd, owner, child, name, nested);
        }

        match child.types.as_slice() {
            [] => Err(ModelInfoError::malformed_definition(
                &sd.url,
                format!("element '{}' declares no type", child.key()),
            )),
            [single] if !child.is_choice() => self.resolve_type_code(&single.code, child.key()),
            types => self.choice(child.base_name(), types, child.key()),
        }
    }

    fn build_nested_class(
        &self,
        sd: &StructureDefinition,
        owner: &str,
        child: &ElementDefinition,
        name: &str,
        nested: &mut Vec<ClassInfo>,
    ) -> Result<TypeSpecifier> {
        let nested_name = format!("{owner}.{}", capitalize(name));

        // reserve the slot so the outer class precedes its own nested classes
        let slot = nested.len();
        nested.push(ClassInfo::default());

        let mut class = self.build_class(sd, &nested_name, child.key(), nested)?;
        let base_code = child
            .types
            .first()
            .map(|t| t.code.as_str())
            .unwrap_or("BackboneElement");
        class.base_type = self
            .resolve_type_code(base_code, child.key())?
            .as_named()
            .map(NamedTypeSpecifier::qualified_name);
        nested[slot] = class;

        Ok(TypeSpecifier::named(self.target.namespace(), nested_name))
    }

    /// Element for an extension slice, typed by the extension's value
    fn build_extension_element(
        &self,
        child: &ElementDefinition,
        slice_name: &str,
    ) -> Result<ClassInfoElement> {
        let settings = self.target.class_info();
        let extension = child
            .types
            .first()
            .and_then(|t| t.profile.first())
            .and_then(|url| self.atlas.by_url(url));

        let mut type_specifier = match extension {
            Some(extension) => self.extension_value_type(extension, child)?,
            None => {
                log::debug!("extension definition for '{}' not found", child.key());
                self.resolve_type_code("Extension", child.key())?
            }
        };
        if child.is_repeating() {
            type_specifier = type_specifier.into_list();
        }

        let mut element = ClassInfoElement::new(slice_name, type_specifier);
        if settings.include_metadata {
            apply_element_metadata(&mut element, child);
        }
        Ok(element)
    }

    /// Type of a simple extension's `value[x]`; complex extensions keep the Extension type
    fn extension_value_type(
        &self,
        extension: &StructureDefinition,
        child: &ElementDefinition,
    ) -> Result<TypeSpecifier> {
        let value = extension
            .elements()
            .iter()
            .find(|e| e.path == "Extension.value[x]" && e.slice_name.is_none())
            .filter(|e| !e.is_prohibited());

        match value.map(|v| v.types.as_slice()) {
            Some([single]) => self.resolve_type_code(&single.code, child.key()),
            Some(types) if !types.is_empty() => self.choice("value", types, child.key()),
            _ => self.resolve_type_code("Extension", child.key()),
        }
    }

    fn choice(&self, base_name: &str, types: &[TypeRef], element: &str) -> Result<TypeSpecifier> {
        let choices = types
            .iter()
            .map(|t| {
                let branch = format!("{base_name}{}", capitalize(type_code_name(&t.code)));
                Ok(ChoiceBranch::new(branch, self.resolve_type_code(&t.code, element)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TypeSpecifier::choice(choices))
    }

    /// Resolve a declared type code to a specifier
    ///
    /// FHIRPath system types map straight to `System`; with native primitives
    /// the mapping tables come next; everything else must be a definition in
    /// the Atlas.
    pub(super) fn resolve_type_code(&self, code: &str, element: &str) -> Result<TypeSpecifier> {
        if let Some(system) = code.strip_prefix(FHIRPATH_SYSTEM_TYPE_BASE) {
            return Ok(TypeSpecifier::system(system));
        }

        let settings = self.target.class_info();
        if settings.use_native_primitives {
            let mapped = settings
                .primitive_type_mappings
                .get(code)
                .or_else(|| settings.cql_type_mappings.get(code));
            if let Some(mapped) = mapped {
                return parse_mapping(code, mapped);
            }
        }

        self.lookup(code)
            .map(|sd| TypeSpecifier::Named(self.qualify(sd)))
            .ok_or_else(|| ModelInfoError::unresolvable_type(code, element))
    }

    /// Definition for a type code: an absolute URL, a core type name, or an id
    pub(super) fn lookup(&self, code: &str) -> Option<&StructureDefinition> {
        if code.contains("://") {
            return self.atlas.by_url(code);
        }
        self.atlas
            .by_url(&format!("{FHIR_STRUCTURE_DEFINITION_BASE}{code}"))
            .or_else(|| self.atlas.by_id(code))
    }

    /// Qualified target types of a Reference element
    fn reference_targets(&self, child: &ElementDefinition) -> Vec<String> {
        let mut targets: Vec<String> = Vec::new();
        let profiles = child
            .types
            .iter()
            .filter(|t| t.code == "Reference")
            .flat_map(|t| t.target_profile.iter());

        for profile in profiles {
            let target = match self.atlas.by_url(profile) {
                Some(sd) => self.qualify(sd).qualified_name(),
                None => {
                    let fallback = format!(
                        "{}.{}",
                        self.target.class_info().external_namespace(),
                        tail(profile)
                    );
                    log::warn!(
                        "target profile {profile} of {} not found, using {fallback}",
                        child.path
                    );
                    fallback
                }
            };
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

fn is_direct_child(key: &str, parent_key: &str) -> bool {
    key.strip_prefix(parent_key)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('.'))
}

fn direct_children<'e>(
    elements: &'e [ElementDefinition],
    parent_key: &'e str,
) -> impl Iterator<Item = &'e ElementDefinition> {
    elements
        .iter()
        .filter(move |e| is_direct_child(e.key(), parent_key))
}

/// Backbone elements with children of their own become nested classes
fn opens_nested_class(elements: &[ElementDefinition], child: &ElementDefinition) -> bool {
    let backbone = child
        .types
        .iter()
        .all(|t| matches!(t.code.as_str(), "BackboneElement" | "Element"));
    backbone && direct_children(elements, child.key()).any(|e| !e.is_prohibited())
}

/// Slicing declared on the unsliced element the slice belongs to
fn slicing_for<'e>(
    elements: &'e [ElementDefinition],
    parent_key: &str,
    child: &ElementDefinition,
) -> Option<&'e Slicing> {
    let base_key = format!("{parent_key}.{}", child.name());
    elements
        .iter()
        .find(|e| e.key() == base_key)
        .and_then(|e| e.slicing.as_ref())
}

fn apply_element_metadata(element: &mut ClassInfoElement, child: &ElementDefinition) {
    element.description = child.short.clone();
    element.definition = child.definition.clone();
    element.comment = child.comment.clone();
    element.must_support = child.must_support;
    element.binding = child.binding.as_ref().map(|b| BindingInfo {
        strength: b.strength.clone(),
        value_set: b.value_set.clone(),
        description: b.description.clone(),
    });
}

fn type_code_name(code: &str) -> &str {
    code.strip_prefix(FHIRPATH_SYSTEM_TYPE_BASE)
        .unwrap_or_else(|| tail(code))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
