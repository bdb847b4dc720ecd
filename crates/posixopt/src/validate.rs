//! Semantic pass: raw values to typed values.
//!
//! Runs after [`crate::parser::SyntaxParser`] and, in order:
//! 1. validates every raw value through its option's type and filter
//! 2. fills defaults and enforces required options, scoped by command
//! 3. rejects options the matched command's usage definition does not allow

use crate::error::{Error, Result};
use crate::option::Opt;
use crate::parser::ParsingResult;
use crate::registry::{OVERFLOW_KEY, OptionRegistry};
use crate::usage::UsageDefinition;
use indexmap::IndexMap;
use posixopt_types::{TypeRegistry, TypedValue};

/// Produce the validated option map, in registration order.
pub fn validate(
    result: &ParsingResult,
    registry: &OptionRegistry,
    types: &TypeRegistry,
    usage: &UsageDefinition,
) -> Result<IndexMap<String, TypedValue>> {
    let mut provided: IndexMap<String, TypedValue> = IndexMap::with_capacity(result.raw_values.len());
    for (name, raw) in &result.raw_values {
        let opt = registry.get(name)?;
        let value = opt.validate_value(raw, types)?;
        tracing::trace!(option = opt.name(), %value, "validated");
        provided.insert(opt.name().to_string(), value);
    }

    let command = result.command.as_deref();
    let mut options = IndexMap::with_capacity(registry.len());
    for opt in registry.options() {
        let name = opt.name();
        let value = if let Some(value) = provided.shift_remove(name) {
            value
        } else if command == Some(name) {
            TypedValue::Bool(true)
        } else if opt.required() && requirement_enforced(opt, command, registry, usage) {
            return Err(Error::usage(format!("Option '{name}' is required")));
        } else {
            opt.default_value()
        };
        options.insert(name.to_string(), value);
    }

    if let Some(command) = command {
        check_usage(result, command, usage)?;
    }

    Ok(options)
}

/// Whether a missing required option is an error in this invocation.
fn requirement_enforced(
    opt: &Opt,
    command: Option<&str>,
    registry: &OptionRegistry,
    usage: &UsageDefinition,
) -> bool {
    match command {
        Some(command) => usage.is_allowed(command, opt.name()),
        // A missing command is reported by the caller, not as a missing option.
        None => !registry.has_commands(),
    }
}

fn check_usage(result: &ParsingResult, command: &str, usage: &UsageDefinition) -> Result<()> {
    if !usage.is_restricted(command) {
        return Ok(());
    }
    for name in result.mapped.keys() {
        if name == OVERFLOW_KEY || name == command {
            continue;
        }
        if !usage.is_allowed(command, name) {
            return Err(Error::usage(format!(
                "Option '{name}' is not allowed with command '{command}'"
            )));
        }
    }
    Ok(())
}
