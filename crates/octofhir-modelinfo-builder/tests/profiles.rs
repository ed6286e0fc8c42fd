//! Profile models layered on the core: slices, extensions, source types

mod common;

use common::*;
use octofhir_modelinfo_builder::{
    ClassInfoBuilder, ClassInfoSet, ModelInfoBuilder, SearchInfoBuilder, TargetModel,
};
use octofhir_modelinfo_fhir::Atlas;
use octofhir_modelinfo_model::{
    BindingInfo, ClassInfoElement, SliceInfo, SliceList, TypeSpecifier,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn extension_slice(name: &str, extension_id: &str) -> Value {
    json!({
        "id": format!("Patient.extension:{name}"),
        "path": "Patient.extension",
        "sliceName": name,
        "min": 0,
        "max": "1",
        "base": { "path": "DomainResource.extension", "min": 0, "max": "*" },
        "type": [{ "code": "Extension", "profile": [format!("{US_CORE}{extension_id}")] }],
    })
}

fn us_core_definitions() -> Vec<Value> {
    vec![
        profile(
            US_CORE,
            "us-core-race",
            "USCoreRaceExtension",
            "complex-type",
            "Extension",
            vec![
                root("Extension"),
                element("Extension.extension", "*", &["Extension"]),
                element("Extension.url", "1", &[&system("String")]),
                element("Extension.value[x]", "0", &["string"]),
            ],
        ),
        profile(
            US_CORE,
            "us-core-birthsex",
            "USCoreBirthSexExtension",
            "complex-type",
            "Extension",
            vec![
                root("Extension"),
                element("Extension.url", "1", &[&system("String")]),
                element("Extension.value[x]", "1", &["code"]),
            ],
        ),
        profile(
            US_CORE,
            "us-core-patient",
            "USCorePatientProfile",
            "resource",
            "Patient",
            vec![
                root("Patient"),
                inherited("Patient.id", "Resource.id", "1", &["string"]),
                with(
                    inherited("Patient.extension", "DomainResource.extension", "*", &["Extension"]),
                    "slicing",
                    json!({ "discriminator": [{ "type": "value", "path": "url" }], "rules": "open" }),
                ),
                extension_slice("race", "us-core-race"),
                extension_slice("birthsex", "us-core-birthsex"),
                with(
                    element("Patient.name", "*", &["string"]),
                    "slicing",
                    json!({ "discriminator": [{ "type": "value", "path": "use" }], "rules": "open" }),
                ),
                with(
                    with(element("Patient.name", "1", &["string"]), "id", json!("Patient.name:official")),
                    "sliceName",
                    json!("official"),
                ),
                with(
                    element("Patient.gender", "1", &["code"]),
                    "binding",
                    json!({
                        "strength": "required",
                        "valueSet": "http://hl7.org/fhir/ValueSet/administrative-gender",
                    }),
                ),
                with(element("Patient.birthDate", "1", &["date"]), "mustSupport", json!(true)),
            ],
        ),
        profile(
            US_CORE,
            "us-core-observation-lab",
            "USCoreObservationLabProfile",
            "resource",
            "Observation",
            vec![
                root("Observation"),
                element("Observation.status", "1", &["code"]),
                element("Observation.code", "1", &["CodeableConcept"]),
                element("Observation.referenceRange", "*", &["Range"]),
                element("Observation.component", "*", &["BackboneElement"]),
                element("Observation.component.code", "1", &["CodeableConcept"]),
                content_reference(
                    "Observation.component.referenceRange",
                    "*",
                    "#Observation.referenceRange",
                ),
            ],
        ),
        search_parameter(
            "name",
            "string",
            &["Patient", "Practitioner"],
            Some("Patient.name | Practitioner.name"),
            &[],
        ),
        search_parameter(
            "subject",
            "reference",
            &["Observation"],
            Some("Observation.subject"),
            &["Patient"],
        ),
    ]
}

fn us_core_atlas() -> Atlas {
    core_atlas_with(us_core_definitions())
}

fn build(atlas: &Atlas, target: &TargetModel) -> ClassInfoSet {
    let mut builder = ClassInfoBuilder::new(atlas, target);
    builder.build().unwrap();
    builder.after_build().unwrap();
    builder.finish()
}

fn fhir(name: &str) -> TypeSpecifier {
    TypeSpecifier::named("FHIR", name)
}

fn names(elements: &[ClassInfoElement]) -> Vec<&str> {
    elements.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_only_profiles_are_built() {
    let atlas = us_core_atlas();
    let classes = build(&atlas, &TargetModel::us_core("6.1.0"));

    let names: Vec<&str> = classes.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "USCore.USCoreObservationLabProfile",
            "USCore.USCoreObservationLabProfile.Component",
            "USCore.USCorePatientProfile",
        ]
    );

    let patient = classes.get_class("USCore.USCorePatientProfile").unwrap();
    assert_eq!(patient.base_type.as_deref(), Some("FHIR.Patient"));
    assert!(patient.retrievable);
    assert_eq!(classes.source_type("USCore.USCorePatientProfile"), Some("Patient"));
}

#[test]
fn test_extension_and_slice_elements() {
    let atlas = us_core_atlas();
    let classes = build(&atlas, &TargetModel::us_core("6.1.0"));
    let patient = classes.get_class("USCore.USCorePatientProfile").unwrap();

    let types: Vec<(&str, &TypeSpecifier)> = patient
        .elements
        .iter()
        .map(|e| (e.name.as_str(), &e.type_specifier))
        .collect();
    assert_eq!(
        types,
        vec![
            ("race", &fhir("Extension")),
            ("birthsex", &fhir("code")),
            ("name", &TypeSpecifier::list(fhir("string"))),
            ("gender", &fhir("code")),
            ("birthDate", &fhir("date")),
        ]
    );

    let mut official = ClassInfoElement::new("official", fhir("string"));
    official.slice = Some(SliceInfo {
        base_element: "name".to_string(),
        slice_name: "official".to_string(),
        discriminator: "value:use".to_string(),
    });
    assert_eq!(
        patient.slices,
        vec![SliceList {
            base_element: "name".to_string(),
            discriminator: "value:use".to_string(),
            elements: vec![official],
        }]
    );
    assert_eq!(patient.element("official").map(|e| &e.type_specifier), Some(&fhir("string")));
}

#[test]
fn test_slices_flattened_when_disabled() {
    let atlas = us_core_atlas();
    let mut target = TargetModel::us_core("6.1.0");
    target.settings.class_info.create_slice_elements = false;
    target.settings.class_info.create_extension_elements = false;
    let classes = build(&atlas, &target);
    let patient = classes.get_class("USCore.USCorePatientProfile").unwrap();

    assert_eq!(
        names(&patient.elements),
        vec!["name", "official", "gender", "birthDate"]
    );
    assert!(patient.slices.is_empty());
    assert_eq!(patient.element("official").unwrap().slice, None);
}

#[test]
fn test_profile_metadata() {
    let atlas = us_core_atlas();
    let mut target = TargetModel::us_core("6.1.0");
    target.settings.class_info.include_metadata = true;
    let classes = build(&atlas, &target);
    let patient = classes.get_class("USCore.USCorePatientProfile").unwrap();

    assert_eq!(patient.identifier.as_deref(), Some(&*format!("{US_CORE}us-core-patient")));
    assert_eq!(patient.label.as_deref(), Some("USCorePatientProfile"));
    assert_eq!(patient.element("birthDate").unwrap().must_support, Some(true));
    assert_eq!(
        patient.element("gender").unwrap().binding,
        Some(BindingInfo {
            strength: "required".to_string(),
            value_set: Some("http://hl7.org/fhir/ValueSet/administrative-gender".to_string()),
            description: None,
        })
    );
}

#[test]
fn test_profile_content_reference_resolves_against_itself() {
    let atlas = us_core_atlas();
    let classes = build(&atlas, &TargetModel::us_core("6.1.0"));

    let component = classes
        .get_class("USCore.USCoreObservationLabProfile.Component")
        .unwrap();
    assert_eq!(component.base_type.as_deref(), Some("FHIR.BackboneElement"));
    assert_eq!(
        component.element("referenceRange").unwrap().type_specifier,
        TypeSpecifier::list(fhir("Range"))
    );

    let observation = classes.get_class("USCore.USCoreObservationLabProfile").unwrap();
    assert_eq!(observation.primary_code_path.as_deref(), Some("code"));
}

#[test]
fn test_search_matches_profile_source_types() {
    let atlas = us_core_atlas();
    let target = TargetModel::us_core("6.1.0");
    let mut classes = build(&atlas, &target);
    let attached = SearchInfoBuilder::new(&atlas, target.class_info(), &mut classes).build();

    assert_eq!(attached, 2);
    let patient = classes.get_class("USCore.USCorePatientProfile").unwrap();
    assert_eq!(patient.search_infos("name").count(), 1);

    let observation = classes.get_class("USCore.USCoreObservationLabProfile").unwrap();
    assert_eq!(
        observation.search_infos("subject").next().unwrap().type_specifier,
        TypeSpecifier::named("USCore", "USCorePatientProfile")
    );
}

#[test]
fn test_profile_model_info() {
    let atlas = us_core_atlas();
    let target = TargetModel::us_core("6.1.0");
    let build = ModelInfoBuilder::new(&atlas, &target).build().unwrap();
    let model = build.model_info;

    assert_eq!(model.name, "USCore");
    assert_eq!(model.version, "6.1.0");
    assert_eq!(
        model.patient_class_name.as_deref(),
        Some("USCore.USCorePatientProfile")
    );
    assert!(model.conversion_infos.is_empty());
    assert_eq!(build.helper_library, None);
    assert_eq!(
        model
            .required_model_infos
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>(),
        vec!["System", "FHIR"]
    );
    assert_eq!(model.context_infos.len(), 1);
    assert_eq!(
        model.context_infos[0].context_type.qualified_name(),
        "USCore.USCorePatientProfile"
    );
}
