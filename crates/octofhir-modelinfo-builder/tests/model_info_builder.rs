//! Complete builds of the core model

mod common;

use common::*;
use octofhir_modelinfo_builder::{ModelInfoBuilder, TargetModel};
use octofhir_modelinfo_model::{
    ConversionInfo, JsonSerializer, ModelInfoSerializer, TypeSpecifier,
};
use pretty_assertions::assert_eq;

#[test]
fn test_fhir_model_header() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let model = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;

    assert_eq!(model.name, "FHIR");
    assert_eq!(model.version, "4.0.1");
    assert_eq!(model.url, "http://hl7.org/fhir");
    assert_eq!(model.target_qualifier.as_deref(), Some("fhir"));
    assert_eq!(model.patient_class_name.as_deref(), Some("FHIR.Patient"));
    assert_eq!(
        model.patient_birth_date_property_name.as_deref(),
        Some("birthDate.value")
    );
    assert_eq!(model.type_infos.len(), 26);
    assert!(model.is_retrievable("FHIR.Observation"));
    assert!(model.is_derived_from("FHIR.Patient", "FHIR.Resource"));
}

#[test]
fn test_conversions_follow_wrapped_primitives() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let model = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;

    let conversion = |from: &str, to: &str, function: &str| ConversionInfo {
        from_type: from.to_string(),
        to_type: to.to_string(),
        function_name: function.to_string(),
    };
    assert_eq!(
        model.conversion_infos,
        vec![
            conversion("FHIR.boolean", "System.Boolean", "FHIRHelpers.ToBoolean"),
            conversion("FHIR.code", "System.String", "FHIRHelpers.ToString"),
            conversion("FHIR.date", "System.Date", "FHIRHelpers.ToDate"),
            conversion("FHIR.dateTime", "System.DateTime", "FHIRHelpers.ToDateTime"),
            conversion("FHIR.decimal", "System.Decimal", "FHIRHelpers.ToDecimal"),
            conversion("FHIR.integer", "System.Integer", "FHIRHelpers.ToInteger"),
            conversion("FHIR.string", "System.String", "FHIRHelpers.ToString"),
            conversion("FHIR.uri", "System.String", "FHIRHelpers.ToString"),
        ]
    );
    assert_eq!(
        model.get_conversion("FHIR.date").map(|c| c.to_type.as_str()),
        Some("System.Date")
    );
}

#[test]
fn test_conversions_without_helper_library() {
    let atlas = core_atlas();
    let mut target = TargetModel::fhir("4.0.1");
    target.settings.model_info.helper_library_name = None;
    let build = ModelInfoBuilder::new(&atlas, &target).build().unwrap();

    assert_eq!(build.helper_library, None);
    assert_eq!(
        build.model_info.get_conversion("FHIR.code").map(|c| c.function_name.as_str()),
        Some("ToString")
    );
}

#[test]
fn test_helper_library_text() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let library = ModelInfoBuilder::new(&atlas, &target)
        .build()
        .unwrap()
        .helper_library
        .unwrap();

    assert_eq!(library.name, "FHIRHelpers");
    assert_eq!(library.path.as_deref(), Some("FHIRHelpers-4.0.1.cql"));
    let lines: Vec<&str> = library.text.lines().collect();
    assert_eq!(lines[0], "library FHIRHelpers version '4.0.1'");
    assert_eq!(lines[2], "using FHIR version '4.0.1'");
    assert_eq!(lines[4], "define function ToBoolean(value FHIR.boolean): value.value");
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("define function")).count(),
        8
    );
}

#[test]
fn test_contexts_for_built_classes_only() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let model = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;

    let contexts: Vec<(&str, String)> = model
        .context_infos
        .iter()
        .map(|c| (c.name.as_str(), c.context_type.qualified_name()))
        .collect();
    assert_eq!(
        contexts,
        vec![
            ("Patient", "FHIR.Patient".to_string()),
            ("Practitioner", "FHIR.Practitioner".to_string()),
            ("Encounter", "FHIR.Encounter".to_string()),
        ]
    );
    assert_eq!(
        model.context_infos[0].birth_date_element.as_deref(),
        Some("birthDate")
    );
}

#[test]
fn test_quick_model_has_no_conversions() {
    let atlas = core_atlas();
    let target = TargetModel::quick("4.0.1");
    let build = ModelInfoBuilder::new(&atlas, &target).build().unwrap();

    assert!(build.model_info.conversion_infos.is_empty());
    assert_eq!(build.helper_library, None);
    assert_eq!(
        build
            .model_info
            .get_property("QUICK.Observation", "code")
            .map(|e| &e.type_specifier),
        Some(&TypeSpecifier::system("Concept"))
    );
}

#[test]
fn test_no_deferred_types_in_output() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let model = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;

    let deferred = model
        .type_infos
        .iter()
        .filter_map(|t| t.as_class())
        .flat_map(|c| c.all_elements())
        .filter(|e| e.type_specifier.is_deferred())
        .count();
    assert_eq!(deferred, 0);
}

#[test]
fn test_output_is_deterministic() {
    let atlas = core_atlas();
    let target = TargetModel::fhir("4.0.1");
    let serializer = JsonSerializer::pretty();

    let first = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;
    let second = ModelInfoBuilder::new(&atlas, &target).build().unwrap().model_info;
    let text = serializer.serialize(&first).unwrap();
    assert_eq!(text, serializer.serialize(&second).unwrap());

    let mut reversed = core_definitions();
    reversed.reverse();
    let reordered = ModelInfoBuilder::new(&atlas_from(reversed), &target)
        .build()
        .unwrap()
        .model_info;
    assert_eq!(text, serializer.serialize(&reordered).unwrap());

    assert_eq!(serializer.deserialize(&text).unwrap(), first);
}
