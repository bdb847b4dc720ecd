//! Declarative option definitions for posixopt.
//!
//! A [`CliSchema`] describes a program's commands, flags, params, terms and
//! usage restrictions as plain data (usually JSON), and [`CliSchema::build`]
//! turns it into a ready-to-use [`GetOpt`]:
//!
//! ```json
//! {
//!   "name": "users",
//!   "options": [
//!     { "kind": "command", "names": ["add"] },
//!     { "kind": "term", "names": ["username"] },
//!     { "kind": "param", "names": ["password", "p"], "required": true },
//!     { "kind": "flag", "names": ["verbose", "v"] }
//!   ],
//!   "usage": { "add": ["username", "password", "verbose"] }
//! }
//! ```

use indexmap::IndexMap;
use posixopt::{
    Command, DefinitionError, Filter, Flag, GetOpt, HelpMeta, Opt, Param, Term, TypeRegistry,
    TypedValue,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("option '{name}': '{field}' is not supported for {kind} options")]
    Unsupported {
        name: String,
        field: &'static str,
        kind: OptionKind,
    },

    #[error("option '{name}' uses unknown type '{type_name}'")]
    UnknownType { name: String, type_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    Command,
    Flag,
    Param,
    Term,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Command => "command",
            Self::Flag => "flag",
            Self::Param => "param",
            Self::Term => "term",
        })
    }
}

/// One option. The first entry of `names` is the primary name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSchema {
    pub kind: OptionKind,
    pub names: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Params default to optional, terms to required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possible_values: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
    /// Allowed options per command.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub usage: IndexMap<String, Vec<String>>,
}

impl CliSchema {
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Build a [`GetOpt`] using the built-in types.
    pub fn build(&self) -> Result<GetOpt, SchemaError> {
        self.build_with_types(TypeRegistry::with_builtins())
    }

    /// Build a [`GetOpt`] whose options may refer to custom types in `types`.
    pub fn build_with_types(&self, types: TypeRegistry) -> Result<GetOpt, SchemaError> {
        let mut getopt = GetOpt::with_types(types);
        for option in &self.options {
            let opt = option.to_opt(getopt.types())?;
            getopt.add_option(opt)?;
        }
        for (command, options) in &self.usage {
            getopt.add_usage(command, options)?;
        }
        tracing::debug!(
            name = %self.name,
            options = self.options.len(),
            usage = self.usage.len(),
            "built option definitions from schema"
        );
        Ok(getopt)
    }

    pub fn help_meta(&self) -> HelpMeta {
        HelpMeta {
            name: self.name.clone(),
            summary: self.summary.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            examples: self.examples.clone(),
        }
    }
}

impl OptionSchema {
    fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or_default()
    }

    fn unsupported(&self, field: &'static str) -> SchemaError {
        SchemaError::Unsupported {
            name: self.primary_name().to_string(),
            field,
            kind: self.kind,
        }
    }

    /// Commands and flags carry no value, so value settings make no sense there.
    fn reject_value_fields(&self) -> Result<(), SchemaError> {
        if self.required == Some(true) {
            return Err(self.unsupported("required"));
        }
        if self.default.is_some() {
            return Err(self.unsupported("default"));
        }
        if self.value_type.is_some() {
            return Err(self.unsupported("value-type"));
        }
        if self.value_name.is_some() {
            return Err(self.unsupported("value-name"));
        }
        if !self.possible_values.is_empty() {
            return Err(self.unsupported("possible-values"));
        }
        Ok(())
    }

    fn value_type(&self, types: &TypeRegistry) -> Result<Option<&str>, SchemaError> {
        match self.value_type.as_deref() {
            Some(type_name) if !types.contains(type_name) => Err(SchemaError::UnknownType {
                name: self.primary_name().to_string(),
                type_name: type_name.to_string(),
            }),
            other => Ok(other),
        }
    }

    fn filter(&self) -> Option<Filter> {
        if self.possible_values.is_empty() {
            None
        } else {
            Some(Filter::one_of(self.possible_values.iter().cloned()))
        }
    }

    /// Validate the default the same way a user-supplied value would be.
    fn default_value(
        &self,
        types: &TypeRegistry,
        type_name: Option<&str>,
        filter: Option<&Filter>,
    ) -> Result<Option<TypedValue>, SchemaError> {
        let Some(raw) = self.default.as_deref() else {
            return Ok(None);
        };
        let invalid = |message: String| {
            SchemaError::Definition(DefinitionError::InvalidDefault {
                name: self.primary_name().to_string(),
                message,
            })
        };
        let value = types
            .validate(type_name.unwrap_or(posixopt::names::STRING), raw)
            .map_err(|e| invalid(e.message().to_string()))?;
        match filter {
            Some(filter) => filter.apply(value).map(Some).map_err(invalid),
            None => Ok(Some(value)),
        }
    }

    fn to_opt(&self, types: &TypeRegistry) -> Result<Opt, SchemaError> {
        let (primary, aliases) = self
            .names
            .split_first()
            .ok_or(SchemaError::Definition(DefinitionError::NoNames))?;

        let opt: Opt = match self.kind {
            OptionKind::Command => {
                self.reject_value_fields()?;
                let mut command = Command::new(primary).description(&self.description);
                for alias in aliases {
                    command = command.alias(alias);
                }
                command.into()
            }
            OptionKind::Flag => {
                self.reject_value_fields()?;
                let mut flag = Flag::new(primary).description(&self.description);
                for alias in aliases {
                    flag = flag.alias(alias);
                }
                flag.into()
            }
            OptionKind::Param => {
                let type_name = self.value_type(types)?;
                let filter = self.filter();
                let default = self.default_value(types, type_name, filter.as_ref())?;

                let mut param = Param::new(primary)
                    .description(&self.description)
                    .required(self.required.unwrap_or(false));
                for alias in aliases {
                    param = param.alias(alias);
                }
                if let Some(type_name) = type_name {
                    param = param.value_type(type_name);
                }
                if let Some(value_name) = &self.value_name {
                    param = param.value_name(value_name);
                }
                if let Some(filter) = filter {
                    param = param.filter(filter);
                }
                if let Some(default) = default {
                    param = param.default_value(default);
                }
                param.into()
            }
            OptionKind::Term => {
                if self.default.is_some() {
                    return Err(self.unsupported("default"));
                }
                let type_name = self.value_type(types)?;

                let mut term = Term::new(primary)
                    .description(&self.description)
                    .required(self.required.unwrap_or(true));
                for alias in aliases {
                    term = term.alias(alias);
                }
                if let Some(type_name) = type_name {
                    term = term.value_type(type_name);
                }
                if let Some(value_name) = &self.value_name {
                    term = term.value_name(value_name);
                }
                if let Some(filter) = self.filter() {
                    term = term.filter(filter);
                }
                term.into()
            }
        };
        Ok(opt)
    }
}
