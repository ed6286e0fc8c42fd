//! Helper library generation
//!
//! Wrapped primitives get an implicit conversion to the system type they
//! carry. Each conversion is backed by a function in a generated CQL helper
//! library; the library text is returned to the caller, which decides where
//! to store it.

use octofhir_modelinfo_model::{ConversionInfo, TypeSpecifier};
use serde::Serialize;

use crate::class_info::ClassInfoSet;
use crate::target::TargetModel;

/// Generated helper library text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperLibrary {
    pub name: String,
    pub version: String,
    /// Where the caller is expected to store the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub text: String,
}

/// One unwrap function: wrapper type to the system type of its value
#[derive(Debug, Clone, PartialEq, Eq)]
struct Unwrap {
    wrapper: String,
    system_type: String,
    function: String,
}

/// Derives ConversionInfos and the helper library from wrapped primitives
pub struct HelperLibraryGenerator<'a> {
    target: &'a TargetModel,
}

impl<'a> HelperLibraryGenerator<'a> {
    pub fn new(target: &'a TargetModel) -> Self {
        Self { target }
    }

    /// Conversions plus the library text, when a helper library is configured
    ///
    /// Function names are `To{X}` after the system type. With a helper
    /// library they are qualified by its name (`FHIRHelpers.ToString`), since
    /// the compiler resolves the conversion against that included library.
    pub fn generate(&self, classes: &ClassInfoSet) -> (Vec<ConversionInfo>, Option<HelperLibrary>) {
        let unwraps = unwraps(classes);
        let library_name = self.target.model_info().helper_library_name.as_deref();

        let conversions = unwraps
            .iter()
            .map(|u| ConversionInfo {
                from_type: u.wrapper.clone(),
                to_type: u.system_type.clone(),
                function_name: match library_name {
                    Some(library) => format!("{library}.{}", u.function),
                    None => u.function.clone(),
                },
            })
            .collect();

        let library = library_name.map(|name| HelperLibrary {
            name: name.to_string(),
            version: self.target.model_info().version.clone(),
            path: self.target.helper_library_path().map(str::to_string),
            text: self.library_text(name, &unwraps),
        });

        (conversions, library)
    }

    fn library_text(&self, name: &str, unwraps: &[Unwrap]) -> String {
        let model = self.target.model_info();
        let mut lines = vec![
            format!("library {name} version '{}'", model.version),
            String::new(),
            format!("using {} version '{}'", self.target.namespace(), model.version),
        ];
        for unwrap in unwraps {
            lines.push(String::new());
            lines.push(format!(
                "define function {}(value {}): value.value",
                unwrap.function, unwrap.wrapper
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Wrapped primitives whose single element carries a system value, by wrapper name
fn unwraps(classes: &ClassInfoSet) -> Vec<Unwrap> {
    let mut unwraps: Vec<Unwrap> = classes
        .primitive_wrappers()
        .iter()
        .filter_map(|wrapper| {
            let class = classes.get_class(wrapper)?;
            let [element] = class.elements.as_slice() else {
                return None;
            };
            let TypeSpecifier::Named(value_type) = &element.type_specifier else {
                return None;
            };
            if !value_type.is_system() {
                return None;
            }
            Some(Unwrap {
                wrapper: wrapper.clone(),
                system_type: value_type.qualified_name(),
                function: format!("To{}", value_type.name),
            })
        })
        .collect();
    unwraps.sort_by(|a, b| a.wrapper.cmp(&b.wrapper));
    unwraps
}
