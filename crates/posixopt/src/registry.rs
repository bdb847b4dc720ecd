use crate::error::{DefinitionError, Error, Result};
use crate::option::Opt;
use std::collections::HashMap;
use std::sync::Arc;

/// Key reserved for operands that no term claimed.
pub const OVERFLOW_KEY: &str = "_";

/// Normalize an option name for lookup.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != OVERFLOW_KEY
        && !name.starts_with('-')
        && !name.contains('=')
        && !name.chars().any(char::is_whitespace)
}

/// Every declared option, indexed by each of its names.
///
/// Lookups are case-insensitive. Commands and terms are additionally kept in
/// registration order; term order decides which operand fills which term.
#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    by_name: HashMap<String, Arc<Opt>>,
    options: Vec<Arc<Opt>>,
    commands: Vec<Arc<Opt>>,
    terms: Vec<Arc<Opt>>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an option under all of its names.
    ///
    /// Nothing is inserted if any name is invalid or already taken.
    pub fn register(&mut self, opt: impl Into<Opt>) -> std::result::Result<Arc<Opt>, DefinitionError> {
        let opt = Arc::new(opt.into());
        if opt.names().is_empty() {
            return Err(DefinitionError::NoNames);
        }

        let mut keys: Vec<String> = Vec::with_capacity(opt.names().len());
        for name in opt.names() {
            let key = normalize(name);
            if !valid_name(&key) {
                return Err(DefinitionError::InvalidName(name.clone()));
            }
            if let Some(existing) = self.by_name.get(&key) {
                return Err(DefinitionError::DuplicateName {
                    name: name.clone(),
                    existing: existing.name().to_string(),
                });
            }
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        for key in keys {
            self.by_name.insert(key, Arc::clone(&opt));
        }
        match opt.as_ref() {
            Opt::Command(_) => self.commands.push(Arc::clone(&opt)),
            Opt::Term(_) => self.terms.push(Arc::clone(&opt)),
            Opt::Flag(_) | Opt::Param(_) => {}
        }
        self.options.push(Arc::clone(&opt));
        tracing::trace!(name = opt.name(), "registered option");
        Ok(opt)
    }

    pub fn find(&self, name: &str) -> Option<&Arc<Opt>> {
        self.by_name.get(&normalize(name))
    }

    /// Like [`OptionRegistry::find`], failing with a usage error for unknown names.
    pub fn get(&self, name: &str) -> Result<&Arc<Opt>> {
        self.find(name)
            .ok_or_else(|| Error::usage(format!("Unknown option '{name}'")))
    }

    /// Resolve `name` only if it names a command.
    pub fn find_command(&self, name: &str) -> Option<&Arc<Opt>> {
        self.find(name).filter(|opt| opt.is_command())
    }

    /// Primary name of the option known as `name`.
    pub fn primary_name(&self, name: &str) -> Option<&str> {
        self.find(name).map(|opt| opt.name())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// All options in registration order.
    pub fn options(&self) -> &[Arc<Opt>] {
        &self.options
    }

    pub fn commands(&self) -> &[Arc<Opt>] {
        &self.commands
    }

    pub fn terms(&self) -> &[Arc<Opt>] {
        &self.terms
    }

    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Lowercase name to primary name, for every name of every option.
    pub(crate) fn alias_map(&self) -> HashMap<String, String> {
        self.by_name
            .iter()
            .map(|(key, opt)| (key.clone(), opt.name().to_string()))
            .collect()
    }
}
