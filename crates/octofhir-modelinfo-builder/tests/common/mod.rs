//! Definition fixtures shared by the builder integration tests
//!
//! A miniature FHIR core: enough primitives, data types and resources to
//! exercise every build path, written the way definition packages arrive.

#![allow(dead_code)]

use octofhir_modelinfo_fhir::Atlas;
use serde_json::{Value, json};

pub const CORE: &str = "http://hl7.org/fhir/StructureDefinition/";
pub const SYSTEM: &str = "http://hl7.org/fhirpath/System.";
pub const US_CORE: &str = "http://hl7.org/fhir/us/core/StructureDefinition/";

pub fn system(name: &str) -> String {
    format!("{SYSTEM}{name}")
}

/// Element whose base path belongs to another type
pub fn inherited(path: &str, base_path: &str, max: &str, types: &[&str]) -> Value {
    json!({
        "id": path,
        "path": path,
        "min": 0,
        "max": max,
        "base": { "path": base_path, "min": 0, "max": max },
        "type": types.iter().map(|code| json!({ "code": code })).collect::<Vec<_>>(),
    })
}

/// Element owned by the definition it appears in
pub fn element(path: &str, max: &str, types: &[&str]) -> Value {
    inherited(path, path, max, types)
}

pub fn content_reference(path: &str, max: &str, reference: &str) -> Value {
    json!({
        "id": path,
        "path": path,
        "min": 0,
        "max": max,
        "base": { "path": path, "min": 0, "max": max },
        "contentReference": reference,
    })
}

pub fn root(path: &str) -> Value {
    json!({
        "id": path,
        "path": path,
        "min": 0,
        "max": "*",
        "base": { "path": path, "min": 0, "max": "*" },
    })
}

/// Set one more field on a fixture
pub fn with(mut value: Value, key: &str, field: Value) -> Value {
    value[key] = field;
    value
}

pub fn definition(kind: &str, name: &str, base: Option<&str>, elements: Vec<Value>) -> Value {
    let mut sd = json!({
        "resourceType": "StructureDefinition",
        "id": name,
        "url": format!("{CORE}{name}"),
        "name": name,
        "kind": kind,
        "abstract": false,
        "type": name,
        "derivation": "specialization",
        "snapshot": { "element": elements },
    });
    if let Some(base) = base {
        sd["baseDefinition"] = json!(format!("{CORE}{base}"));
    }
    sd
}

pub fn primitive(name: &str, system_type: &str) -> Value {
    definition(
        "primitive-type",
        name,
        Some("Element"),
        vec![
            root(name),
            inherited(&format!("{name}.id"), "Element.id", "1", &[&system("String")]),
            element(&format!("{name}.value"), "1", &[&system(system_type)]),
        ],
    )
}

pub fn complex_type(name: &str, elements: Vec<Value>) -> Value {
    let mut all = vec![
        root(name),
        inherited(&format!("{name}.id"), "Element.id", "1", &[&system("String")]),
    ];
    all.extend(elements);
    definition("complex-type", name, Some("Element"), all)
}

pub fn resource(name: &str, elements: Vec<Value>) -> Value {
    let mut all = vec![
        root(name),
        inherited(&format!("{name}.id"), "Resource.id", "1", &["string"]),
        inherited(
            &format!("{name}.extension"),
            "DomainResource.extension",
            "*",
            &["Extension"],
        ),
    ];
    all.extend(elements);
    definition("resource", name, Some("DomainResource"), all)
}

/// Constraint on an existing type, published under `base_url`
pub fn profile(
    base_url: &str,
    id: &str,
    name: &str,
    kind: &str,
    type_name: &str,
    elements: Vec<Value>,
) -> Value {
    json!({
        "resourceType": "StructureDefinition",
        "id": id,
        "url": format!("{base_url}{id}"),
        "name": name,
        "title": name,
        "kind": kind,
        "abstract": false,
        "type": type_name,
        "baseDefinition": format!("{CORE}{type_name}"),
        "derivation": "constraint",
        "snapshot": { "element": elements },
    })
}

pub fn search_parameter(
    code: &str,
    kind: &str,
    base: &[&str],
    expression: Option<&str>,
    target: &[&str],
) -> Value {
    let mut sp = json!({
        "resourceType": "SearchParameter",
        "url": format!("http://hl7.org/fhir/SearchParameter/{}-{code}", base.join("-")),
        "name": code,
        "code": code,
        "base": base,
        "type": kind,
    });
    if let Some(expression) = expression {
        sp["expression"] = json!(expression);
    }
    if !target.is_empty() {
        sp["target"] = json!(target);
    }
    sp
}

/// Core definitions: infrastructure types, eight primitives, a handful of
/// data types and five resources
pub fn core_definitions() -> Vec<Value> {
    vec![
        with(
            definition(
                "complex-type",
                "Element",
                None,
                vec![
                    root("Element"),
                    element("Element.id", "1", &[&system("String")]),
                    element("Element.extension", "*", &["Extension"]),
                ],
            ),
            "abstract",
            json!(true),
        ),
        definition(
            "complex-type",
            "BackboneElement",
            Some("Element"),
            vec![
                root("BackboneElement"),
                inherited("BackboneElement.id", "Element.id", "1", &[&system("String")]),
                inherited("BackboneElement.extension", "Element.extension", "*", &["Extension"]),
                element("BackboneElement.modifierExtension", "*", &["Extension"]),
            ],
        ),
        complex_type(
            "Extension",
            vec![
                element("Extension.url", "1", &[&system("String")]),
                element("Extension.value[x]", "1", &["string", "integer", "code"]),
            ],
        ),
        primitive("boolean", "Boolean"),
        primitive("code", "String"),
        primitive("date", "Date"),
        primitive("dateTime", "DateTime"),
        primitive("decimal", "Decimal"),
        primitive("integer", "Integer"),
        primitive("string", "String"),
        primitive("uri", "String"),
        complex_type(
            "Coding",
            vec![
                element("Coding.system", "1", &["uri"]),
                element("Coding.code", "1", &["code"]),
                element("Coding.display", "1", &["string"]),
            ],
        ),
        complex_type(
            "CodeableConcept",
            vec![
                element("CodeableConcept.coding", "*", &["Coding"]),
                element("CodeableConcept.text", "1", &["string"]),
            ],
        ),
        complex_type(
            "Quantity",
            vec![
                element("Quantity.value", "1", &["decimal"]),
                element("Quantity.unit", "1", &["string"]),
            ],
        ),
        complex_type(
            "Range",
            vec![
                element("Range.low", "1", &["Quantity"]),
                element("Range.high", "1", &["Quantity"]),
            ],
        ),
        complex_type(
            "Period",
            vec![
                element("Period.start", "1", &["dateTime"]),
                element("Period.end", "1", &["dateTime"]),
            ],
        ),
        complex_type(
            "Reference",
            vec![
                element("Reference.reference", "1", &["string"]),
                element("Reference.display", "1", &["string"]),
            ],
        ),
        with(
            definition(
                "resource",
                "Resource",
                None,
                vec![root("Resource"), element("Resource.id", "1", &["string"])],
            ),
            "abstract",
            json!(true),
        ),
        with(
            definition(
                "resource",
                "DomainResource",
                Some("Resource"),
                vec![
                    root("DomainResource"),
                    inherited("DomainResource.id", "Resource.id", "1", &["string"]),
                    element("DomainResource.extension", "*", &["Extension"]),
                ],
            ),
            "abstract",
            json!(true),
        ),
        resource(
            "Patient",
            vec![
                element("Patient.name", "*", &["string"]),
                element("Patient.gender", "1", &["code"]),
                element("Patient.birthDate", "1", &["date"]),
                element("Patient.contact", "*", &["BackboneElement"]),
                inherited("Patient.contact.id", "Element.id", "1", &[&system("String")]),
                element("Patient.contact.name", "1", &["string"]),
                element("Patient.link", "*", &["BackboneElement"]),
                with(
                    element("Patient.link.other", "1", &[]),
                    "type",
                    json!([{ "code": "Reference", "targetProfile": [format!("{CORE}Patient")] }]),
                ),
                element("Patient.link.type", "1", &["code"]),
            ],
        ),
        resource(
            "Practitioner",
            vec![element("Practitioner.name", "*", &["string"])],
        ),
        resource(
            "Encounter",
            vec![
                element("Encounter.status", "1", &["code"]),
                element("Encounter.period", "1", &["Period"]),
            ],
        ),
        resource(
            "Observation",
            vec![
                element("Observation.status", "1", &["code"]),
                element("Observation.code", "1", &["CodeableConcept"]),
                with(
                    element("Observation.subject", "1", &[]),
                    "type",
                    json!([{
                        "code": "Reference",
                        "targetProfile": [format!("{CORE}Patient"), format!("{CORE}Practitioner")],
                    }]),
                ),
                element("Observation.effective[x]", "1", &["dateTime", "Period"]),
                element("Observation.value[x]", "1", &["Quantity", "string", "CodeableConcept"]),
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
    ]
}

pub fn atlas_from(resources: Vec<Value>) -> Atlas {
    let mut atlas = Atlas::new();
    atlas.load_all(resources).unwrap();
    atlas
}

pub fn core_atlas() -> Atlas {
    atlas_from(core_definitions())
}

/// Core definitions plus extra resources
pub fn core_atlas_with(extra: Vec<Value>) -> Atlas {
    let mut resources = core_definitions();
    resources.extend(extra);
    atlas_from(resources)
}
