use crate::registry::{OptionRegistry, normalize};
use indexmap::IndexMap;
use posixopt_types::TypedValue;
use serde::Serialize;
use std::collections::HashMap;

/// The validated result of a successful parse.
///
/// Every registered option has an entry in [`Input::options`], holding
/// either the provided value or the option's default. Lookups accept any
/// alias and ignore case.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Input {
    command: Option<String>,
    options: IndexMap<String, TypedValue>,
    non_options: Vec<String>,
    #[serde(skip)]
    aliases: HashMap<String, String>,
}

impl Input {
    pub(crate) fn new(
        command: Option<String>,
        options: IndexMap<String, TypedValue>,
        non_options: Vec<String>,
        registry: &OptionRegistry,
    ) -> Self {
        Self {
            command,
            options,
            non_options,
            aliases: registry.alias_map(),
        }
    }

    /// Primary name of the matched command.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    fn key(&self, name: &str) -> String {
        let name = normalize(name);
        self.aliases.get(&name).cloned().unwrap_or(name)
    }

    /// Value of the option known as `name`.
    ///
    /// `Some(TypedValue::Null)` means the option exists but has no value;
    /// `None` means no such option.
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.options.get(&self.key(name))
    }

    /// Whether an entry exists for `name`, even if its value is null.
    pub fn has(&self, name: &str) -> bool {
        self.options.contains_key(&self.key(name))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TypedValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(TypedValue::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(TypedValue::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(TypedValue::as_float)
    }

    pub fn options(&self) -> &IndexMap<String, TypedValue> {
        &self.options
    }

    /// Operands left over after every term was filled.
    pub fn non_options(&self) -> &[String] {
        &self.non_options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{Flag, Param};

    fn input() -> Input {
        let mut registry = OptionRegistry::new();
        registry.register(Flag::new("verbose").alias("v")).unwrap();
        registry.register(Param::new("output").alias("o")).unwrap();
        let mut options = IndexMap::new();
        options.insert("verbose".to_string(), TypedValue::Bool(true));
        options.insert("output".to_string(), TypedValue::Null);
        Input::new(None, options, vec!["rest".to_string()], &registry)
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let input = input();
        assert!(input.has("output"));
        assert_eq!(input.get("output"), Some(&TypedValue::Null));
        assert!(!input.has("missing"));
        assert_eq!(input.get("missing"), None);
    }

    #[test]
    fn lookups_resolve_aliases() {
        let input = input();
        assert_eq!(input.get_bool("V"), Some(true));
        assert!(input.has("o"));
        assert_eq!(input.non_options(), ["rest"]);
        assert!(!input.has(" verbose"));
        assert_eq!(input.get("o\n"), None);
    }

    #[test]
    fn serializes_without_aliases() {
        let json = serde_json::to_value(input()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "command": null,
                "options": {"verbose": true, "output": null},
                "non-options": ["rest"],
            })
        );
    }
}
