//! ModelInfo builder
//!
//! Orchestrates a complete build of one target model. The sequence is fixed:
//! build classes and fix up content references, derive conversions and the
//! helper library (before build), assemble the ModelInfo, then attach search
//! and context infos (after build).

use octofhir_modelinfo_diagnostics::Result;
use octofhir_modelinfo_fhir::Atlas;
use octofhir_modelinfo_model::{ConversionInfo, ModelInfo};

use crate::class_info::{ClassInfoBuilder, ClassInfoSet};
use crate::context_info::ContextInfoBuilder;
use crate::helpers::{HelperLibrary, HelperLibraryGenerator};
use crate::search_info::SearchInfoBuilder;
use crate::target::TargetModel;

/// Output of one build
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBuild {
    pub model_info: ModelInfo,
    /// Generated helper library, for models configured with one
    pub helper_library: Option<HelperLibrary>,
}

/// Builds the ModelInfo of one target model
///
/// The builder holds no state between builds; building twice from the same
/// Atlas yields identical output.
pub struct ModelInfoBuilder<'a> {
    atlas: &'a Atlas,
    target: &'a TargetModel,
}

impl<'a> ModelInfoBuilder<'a> {
    pub fn new(atlas: &'a Atlas, target: &'a TargetModel) -> Self {
        Self { atlas, target }
    }

    pub fn build(&self) -> Result<ModelBuild> {
        let mut class_builder = ClassInfoBuilder::new(self.atlas, self.target);
        class_builder.build()?;
        class_builder.after_build()?;
        let mut classes = class_builder.finish();

        let (conversions, helper_library) = self.before_build(&classes);
        let mut model_info = self.assemble(conversions);
        self.after_build(&mut model_info, &mut classes);
        model_info.type_infos = classes.into_type_infos();

        log::info!(
            "built model {} {}: {} types, {} conversions, {} contexts",
            model_info.name,
            model_info.version,
            model_info.type_infos.len(),
            model_info.conversion_infos.len(),
            model_info.context_infos.len()
        );

        Ok(ModelBuild {
            model_info,
            helper_library,
        })
    }

    fn before_build(&self, classes: &ClassInfoSet) -> (Vec<ConversionInfo>, Option<HelperLibrary>) {
        HelperLibraryGenerator::new(self.target).generate(classes)
    }

    /// ModelInfo header from the settings
    fn assemble(&self, conversions: Vec<ConversionInfo>) -> ModelInfo {
        let settings = self.target.model_info();
        let mut model_info = ModelInfo::new(&settings.name, &settings.version);
        model_info.url = settings.url.clone();
        model_info.target_qualifier = settings.target_qualifier.clone();
        model_info.target_version = settings.target_version.clone();
        model_info.patient_class_name = settings.patient_class_name.clone();
        model_info.patient_birth_date_property_name =
            settings.patient_birth_date_property_name.clone();
        model_info.required_model_infos = settings.required_models.clone();
        model_info.conversion_infos = conversions;
        model_info
    }

    fn after_build(&self, model_info: &mut ModelInfo, classes: &mut ClassInfoSet) {
        SearchInfoBuilder::new(self.atlas, self.target.class_info(), classes).build();
        model_info.context_infos =
            ContextInfoBuilder::new(self.target.namespace(), &self.target.model_info().contexts)
                .build(classes);
    }
}
