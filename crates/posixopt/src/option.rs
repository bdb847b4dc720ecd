//! The option model.
//!
//! Options come in four fixed variants, wrapped by [`Opt`]:
//! - [`Command`]: a subcommand selector, at most one per invocation
//! - [`Flag`]: a boolean switch
//! - [`Param`]: a named option taking a value
//! - [`Term`]: a named positional argument, filled from operands in order
//!
//! Each variant is built with a small consuming builder and converted into
//! an [`Opt`] when registered.

use posixopt_types::{TypeRegistry, TypedValue, ValidationError, names};
use std::fmt;
use std::sync::Arc;

/// A post-validation transform applied to a [`Param`] or [`Term`] value.
///
/// Returning `Err(message)` rejects the value.
#[derive(Clone)]
pub struct Filter(Arc<dyn Fn(TypedValue) -> Result<TypedValue, String> + Send + Sync>);

impl Filter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(TypedValue) -> Result<TypedValue, String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Reject values whose text form is not one of `allowed`.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        Self::new(move |value| {
            let text = value.to_string();
            if allowed.iter().any(|a| *a == text) {
                Ok(value)
            } else {
                Err(format!(
                    "'{text}' is not one of: {}",
                    allowed.join(", ")
                ))
            }
        })
    }

    pub fn apply(&self, value: TypedValue) -> Result<TypedValue, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Value handling shared by [`Param`] and [`Term`].
#[derive(Debug, Clone)]
struct ValueSpec {
    type_name: String,
    value_name: Option<String>,
    filter: Option<Filter>,
}

impl Default for ValueSpec {
    fn default() -> Self {
        Self {
            type_name: names::STRING.to_string(),
            value_name: None,
            filter: None,
        }
    }
}

impl ValueSpec {
    fn validate(
        &self,
        name: &str,
        raw: &str,
        types: &TypeRegistry,
    ) -> Result<TypedValue, ValidationError> {
        let value = types.validate(&self.type_name, raw)?;
        match &self.filter {
            Some(filter) => filter.apply(value).map_err(|message| {
                ValidationError::new(format!("Filter rejected value for '{name}': {message}"))
            }),
            None => Ok(value),
        }
    }
}

fn names_from(primary: impl Into<String>) -> Vec<String> {
    vec![primary.into()]
}

#[derive(Debug, Clone)]
pub struct Command {
    names: Vec<String>,
    description: String,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: names_from(name),
            description: String::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Flag {
    names: Vec<String>,
    description: String,
}

impl Flag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: names_from(name),
            description: String::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    names: Vec<String>,
    description: String,
    required: bool,
    default: Option<TypedValue>,
    spec: ValueSpec,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: names_from(name),
            description: String::new(),
            required: false,
            default: None,
            spec: ValueSpec::default(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<TypedValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Type registry key used to validate the value. Defaults to `string`.
    pub fn value_type(mut self, type_name: impl Into<String>) -> Self {
        self.spec.type_name = type_name.into();
        self
    }

    /// Placeholder shown in help output.
    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.spec.value_name = Some(value_name.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.spec.filter = Some(filter);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Term {
    names: Vec<String>,
    description: String,
    required: bool,
    spec: ValueSpec,
}

impl Term {
    /// A required positional argument of type `string`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            names: names_from(name),
            description: String::new(),
            required: true,
            spec: ValueSpec::default(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.names.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn value_type(mut self, type_name: impl Into<String>) -> Self {
        self.spec.type_name = type_name.into();
        self
    }

    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.spec.value_name = Some(value_name.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.spec.filter = Some(filter);
        self
    }
}

/// A registered option of any variant.
#[derive(Debug, Clone)]
pub enum Opt {
    Command(Command),
    Flag(Flag),
    Param(Param),
    Term(Term),
}

impl Opt {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Command(c) => &c.names,
            Self::Flag(f) => &f.names,
            Self::Param(p) => &p.names,
            Self::Term(t) => &t.names,
        }
    }

    /// Primary (canonical) name.
    pub fn name(&self) -> &str {
        self.names().first().map(String::as_str).unwrap_or_default()
    }

    pub fn aliases(&self) -> &[String] {
        self.names().get(1..).unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Command(c) => &c.description,
            Self::Flag(f) => &f.description,
            Self::Param(p) => &p.description,
            Self::Term(t) => &t.description,
        }
    }

    pub fn accepts_value(&self) -> bool {
        matches!(self, Self::Param(_) | Self::Term(_))
    }

    pub fn required(&self) -> bool {
        match self {
            Self::Command(_) | Self::Flag(_) => false,
            Self::Param(p) => p.required,
            Self::Term(t) => t.required,
        }
    }

    /// Value used when the option was not given.
    pub fn default_value(&self) -> TypedValue {
        match self {
            Self::Flag(_) => TypedValue::Bool(false),
            Self::Param(p) => p.default.clone().unwrap_or(TypedValue::Null),
            Self::Command(_) | Self::Term(_) => TypedValue::Null,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        self.value_spec().map(|s| s.type_name.as_str())
    }

    pub fn value_name(&self) -> Option<&str> {
        self.value_spec().and_then(|s| s.value_name.as_deref())
    }

    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }

    pub fn is_term(&self) -> bool {
        matches!(self, Self::Term(_))
    }

    fn value_spec(&self) -> Option<&ValueSpec> {
        match self {
            Self::Param(p) => Some(&p.spec),
            Self::Term(t) => Some(&t.spec),
            Self::Command(_) | Self::Flag(_) => None,
        }
    }

    /// Run the type validator and then the filter on `raw`.
    ///
    /// Flags go through whatever validator is registered as `boolean`.
    pub fn validate_value(
        &self,
        raw: &str,
        types: &TypeRegistry,
    ) -> Result<TypedValue, ValidationError> {
        match self {
            Self::Flag(_) => types.validate(names::BOOLEAN, raw),
            Self::Command(_) => Err(ValidationError::new(format!(
                "Command '{}' does not accept a value",
                self.name()
            ))),
            Self::Param(p) => p.spec.validate(self.name(), raw, types),
            Self::Term(t) => t.spec.validate(self.name(), raw, types),
        }
    }
}

impl From<Command> for Opt {
    fn from(c: Command) -> Self {
        Self::Command(c)
    }
}

impl From<Flag> for Opt {
    fn from(f: Flag) -> Self {
        Self::Flag(f)
    }
}

impl From<Param> for Opt {
    fn from(p: Param) -> Self {
        Self::Param(p)
    }
}

impl From<Term> for Opt {
    fn from(t: Term) -> Self {
        Self::Term(t)
    }
}
