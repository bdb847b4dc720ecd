use crate::{TypedValue, ValidationError, Validator, names, validators};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Validators keyed by case-insensitive type name.
#[derive(Clone)]
pub struct TypeRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl TypeRegistry {
    /// A registry with no types at all.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    /// A registry holding every built-in type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry
            .register(names::STRING, validators::string)
            .register(names::INTEGER, validators::integer)
            .register(names::FLOAT, validators::float)
            .register(names::BOOLEAN, validators::boolean)
            .register(names::EMAIL, validators::email)
            .register(names::URL, validators::url)
            .register(names::DATE, validators::date)
            .register(names::VERSION, validators::version);
        registry
    }

    /// Register (or replace) a validator.
    pub fn register<V>(&mut self, name: &str, validator: V) -> &mut Self
    where
        V: Validator + 'static,
    {
        self.validators
            .insert(name.to_lowercase(), Arc::new(validator));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&dyn Validator> {
        self.validators
            .get(&name.to_lowercase())
            .map(|v| &**v)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Validator, ValidationError> {
        self.find(name)
            .ok_or_else(|| ValidationError::new(format!("Unknown type '{name}'")))
    }

    /// Look up `type_name` and run its validator on `raw`.
    pub fn validate(&self, type_name: &str, raw: &str) -> Result<TypedValue, ValidationError> {
        self.get(type_name)?.validate(raw)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.validators.keys().map(|k| k.as_str()).collect();
        out.sort_unstable();
        out
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let registry = TypeRegistry::default();
        assert!(registry.contains("STRING"));
        assert_eq!(
            registry.validate("Integer", "12").unwrap(),
            TypedValue::Int(12)
        );
    }

    #[test]
    fn unknown_type_is_a_validation_error() {
        let registry = TypeRegistry::default();
        let err = registry.validate("color", "red").unwrap_err();
        assert_eq!(err.message(), "Unknown type 'color'");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn padded_type_names_do_not_match() {
        let registry = TypeRegistry::default();
        assert!(!registry.contains(" integer"));
        assert!(registry.validate("integer\t", "12").is_err());
    }

    #[test]
    fn closures_register_as_validators() {
        let mut registry = TypeRegistry::empty();
        registry.register("upper", |raw: &str| {
            if raw.chars().all(|c| c.is_ascii_uppercase()) {
                Ok(TypedValue::from(raw))
            } else {
                Err(ValidationError::new(format!("'{raw}' is not upper case")))
            }
        });
        assert!(registry.validate("upper", "ABC").is_ok());
        assert!(registry.validate("upper", "AbC").is_err());
        assert!(!registry.contains("string"));
    }
}
