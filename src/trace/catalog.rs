//! Localized message lookup.
//!
//! Templates are the English source strings. A catalog maps a template to
//! its translation and then fills `{key}` placeholders from the supplied
//! arguments. With no translation configured the template is used as is.

use std::collections::HashMap;

/// Label printed ahead of the request dump.
pub const REQUEST_LABEL: &str = "REQUEST:";
/// Label printed ahead of the response dump.
pub const RESPONSE_LABEL: &str = "RESPONSE:";
/// Label printed ahead of the elapsed time.
pub const ELAPSED_LABEL: &str = "Elapsed:";
/// Diagnostic written when the request could not be dumped.
pub const REQUEST_DUMP_FAILED: &str = "An error occurred while dumping request:\n{error}\n";
/// Diagnostic written when the response could not be dumped.
pub const RESPONSE_DUMP_FAILED: &str = "An error occurred while dumping response:\n{error}\n";

#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    translations: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog that returns every template untranslated.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_translations(translations: HashMap<String, String>) -> Self {
        Self { translations }
    }

    /// Translate `template` and substitute each `{key}` with its value.
    pub fn translate(&self, template: &str, args: &[(&str, &str)]) -> String {
        let mut text = self
            .translations
            .get(template)
            .map(String::as_str)
            .unwrap_or(template)
            .to_string();

        for (key, value) in args {
            text = text.replace(&format!("{{{key}}}"), value);
        }
        text
    }
}
