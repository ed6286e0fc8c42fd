//! ClassInfo builder
//!
//! Compiles the structure definitions selected by a [`TargetModel`] into
//! TypeInfos. The build runs in three ordered phases (primitives, complex
//! types, resources) followed by the content-reference fix-up pass
//! ([`ClassInfoBuilder::after_build`]).

mod content_reference;
mod elements;

use std::fmt;

use indexmap::IndexMap;
use octofhir_modelinfo_diagnostics::{ModelInfoError, Result};
use octofhir_modelinfo_fhir::{Atlas, StructureDefinition, tail};
use octofhir_modelinfo_model::{
    ClassInfo, ClassInfoElement, NamedTypeSpecifier, SimpleTypeInfo, TypeInfo, TypeSpecifier,
};

use crate::target::TargetModel;

/// Build phase; phases run in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Primitives,
    ComplexTypes,
    Resources,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Primitives, Phase::ComplexTypes, Phase::Resources];

    fn accepts(self, sd: &StructureDefinition) -> bool {
        match self {
            Phase::Primitives => sd.is_primitive(),
            Phase::ComplexTypes => sd.is_complex_type(),
            Phase::Resources => sd.is_resource(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Primitives => write!(f, "primitive types"),
            Phase::ComplexTypes => write!(f, "complex types"),
            Phase::Resources => write!(f, "resources"),
        }
    }
}

/// TypeInfos of one model keyed by qualified name, in build order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassInfoSet {
    type_infos: IndexMap<String, TypeInfo>,
    /// Qualified class name to the FHIR type its definition describes
    source_types: IndexMap<String, String>,
    /// Qualified names of wrapped primitive classes
    primitive_wrappers: Vec<String>,
}

impl ClassInfoSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type; a second type with the same qualified name is an error
    pub fn insert(&mut self, type_info: TypeInfo, source_type: Option<&str>) -> Result<()> {
        let name = type_info.qualified_name();
        if self.type_infos.contains_key(&name) {
            return Err(ModelInfoError::duplicate_name(name));
        }
        if let Some(source_type) = source_type {
            self.source_types.insert(name.clone(), source_type.to_string());
        }
        self.type_infos.insert(name, type_info);
        Ok(())
    }

    pub fn get(&self, qualified_name: &str) -> Option<&TypeInfo> {
        self.type_infos.get(qualified_name)
    }

    pub fn get_class(&self, qualified_name: &str) -> Option<&ClassInfo> {
        self.get(qualified_name).and_then(TypeInfo::as_class)
    }

    pub fn get_class_mut(&mut self, qualified_name: &str) -> Option<&mut ClassInfo> {
        self.type_infos
            .get_mut(qualified_name)
            .and_then(TypeInfo::as_class_mut)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.type_infos.contains_key(qualified_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TypeInfo)> {
        self.type_infos.iter()
    }

    pub fn len(&self) -> usize {
        self.type_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.type_infos.is_empty()
    }

    /// FHIR type described by a class built from a definition
    pub fn source_type(&self, qualified_name: &str) -> Option<&str> {
        self.source_types.get(qualified_name).map(String::as_str)
    }

    /// Qualified names of the classes built from definitions of `source_type`
    pub fn classes_for_source_type<'s>(
        &'s self,
        source_type: &'s str,
    ) -> impl Iterator<Item = &'s str> {
        self.source_types
            .iter()
            .filter(move |(_, t)| t.as_str() == source_type)
            .map(|(name, _)| name.as_str())
    }

    pub fn primitive_wrappers(&self) -> &[String] {
        &self.primitive_wrappers
    }

    pub fn into_type_infos(self) -> Vec<TypeInfo> {
        self.type_infos.into_values().collect()
    }
}

/// Builds the ClassInfos of one target model from an Atlas
pub struct ClassInfoBuilder<'a> {
    atlas: &'a Atlas,
    target: &'a TargetModel,
    classes: ClassInfoSet,
}

impl<'a> ClassInfoBuilder<'a> {
    pub fn new(atlas: &'a Atlas, target: &'a TargetModel) -> Self {
        Self {
            atlas,
            target,
            classes: ClassInfoSet::new(),
        }
    }

    /// Run the three build phases in order
    ///
    /// Content references stay deferred until [`after_build`](Self::after_build).
    pub fn build(&mut self) -> Result<&ClassInfoSet> {
        for phase in Phase::ALL {
            self.build_phase(phase)?;
        }
        Ok(&self.classes)
    }

    pub fn classes(&self) -> &ClassInfoSet {
        &self.classes
    }

    pub fn finish(self) -> ClassInfoSet {
        self.classes
    }

    fn build_phase(&mut self, phase: Phase) -> Result<()> {
        let atlas = self.atlas;
        let target = self.target;
        let mut definitions: Vec<&'a StructureDefinition> = atlas
            .structure_definitions()
            .filter(|sd| phase.accepts(sd) && target.includes(sd))
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.url.cmp(&b.url)));

        log::info!(
            "building {} {} for model {}",
            definitions.len(),
            phase,
            target.namespace()
        );

        for sd in definitions {
            match phase {
                Phase::Primitives => self.build_primitive(sd)?,
                Phase::ComplexTypes | Phase::Resources => self.build_structure(sd)?,
            }
        }
        Ok(())
    }

    fn build_primitive(&mut self, sd: &StructureDefinition) -> Result<()> {
        let target = self.target;
        let namespace = target.namespace();
        let value_type = self.primitive_value_type(sd)?;

        if target.class_info().use_native_primitives {
            let base_type = value_type
                .as_named()
                .map(NamedTypeSpecifier::qualified_name)
                .ok_or_else(|| ModelInfoError::unresolvable_type(&sd.type_, &sd.name))?;
            let simple = SimpleTypeInfo {
                namespace: namespace.to_string(),
                name: sd.name.clone(),
                base_type,
            };
            return self.classes.insert(TypeInfo::Simple(simple), Some(&sd.type_));
        }

        let mut class = ClassInfo::new(namespace, &sd.name);
        class.base_type = self.resolve_base_type(sd);
        class
            .elements
            .push(ClassInfoElement::new("value", value_type));
        self.apply_class_metadata(&mut class, sd);

        let name = class.qualified_name();
        self.classes.insert(TypeInfo::Class(class), Some(&sd.type_))?;
        self.classes.primitive_wrappers.push(name);
        Ok(())
    }

    /// System type carried by a primitive: the mapping table first, then the
    /// declared type of its `value` element
    fn primitive_value_type(&self, sd: &StructureDefinition) -> Result<TypeSpecifier> {
        let value_path = format!("{}.value", sd.type_);
        if let Some(mapped) = self
            .target
            .class_info()
            .primitive_type_mappings
            .get(&sd.type_)
        {
            return parse_mapping(&sd.type_, mapped);
        }

        sd.elements()
            .iter()
            .find(|e| e.path == value_path)
            .and_then(|e| e.types.first())
            .and_then(|t| t.code.strip_prefix(octofhir_modelinfo_fhir::FHIRPATH_SYSTEM_TYPE_BASE))
            .map(TypeSpecifier::system)
            .ok_or_else(|| ModelInfoError::unresolvable_type(&sd.type_, value_path))
    }

    fn build_structure(&mut self, sd: &StructureDefinition) -> Result<()> {
        let root = sd.root_element().ok_or_else(|| {
            ModelInfoError::malformed_definition(&sd.url, "snapshot has no root element")
        })?;

        let mut nested = Vec::new();
        let mut class = self.build_class(sd, &sd.name, root.key(), &mut nested)?;
        class.base_type = self.resolve_base_type(sd);
        if sd.is_resource() {
            class.retrievable = !sd.is_abstract;
            class.primary_code_path = self
                .target
                .class_info()
                .primary_code_paths
                .get(&sd.type_)
                .cloned();
        }
        self.apply_class_metadata(&mut class, sd);

        self.classes.insert(TypeInfo::Class(class), Some(&sd.type_))?;
        for class in nested {
            self.classes.insert(TypeInfo::Class(class), None)?;
        }
        Ok(())
    }

    /// Qualified name of the definition's base type
    fn resolve_base_type(&self, sd: &StructureDefinition) -> Option<String> {
        let url = sd.base_definition.as_deref()?;
        Some(match self.atlas.by_url(url) {
            Some(base) => self.qualify(base).qualified_name(),
            None => {
                let fallback = format!(
                    "{}.{}",
                    self.target.class_info().external_namespace(),
                    tail(url)
                );
                log::warn!("base definition {url} of {} not found, using {fallback}", sd.url);
                fallback
            }
        })
    }

    /// Name a definition in this model, or in the dependency namespace when
    /// this model does not build it
    fn qualify(&self, sd: &StructureDefinition) -> NamedTypeSpecifier {
        if self.target.includes(sd) {
            return NamedTypeSpecifier::new(self.target.namespace(), &sd.name);
        }
        let name = if sd.is_specialization() {
            &sd.name
        } else {
            &sd.type_
        };
        NamedTypeSpecifier::new(self.target.class_info().external_namespace(), name)
    }

    fn apply_class_metadata(&self, class: &mut ClassInfo, sd: &StructureDefinition) {
        if !self.target.class_info().include_metadata {
            return;
        }
        class.identifier = Some(sd.url.clone());
        class.label = Some(sd.title.clone().unwrap_or_else(|| sd.name.clone()));
    }
}

fn parse_mapping(code: &str, mapped: &str) -> Result<TypeSpecifier> {
    TypeSpecifier::parse(mapped).ok_or_else(|| {
        ModelInfoError::invalid_settings(format!(
            "mapping for '{code}' has an invalid target type '{mapped}'"
        ))
    })
}
