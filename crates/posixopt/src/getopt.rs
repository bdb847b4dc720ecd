use crate::error::{DefinitionError, Result};
use crate::input::Input;
use crate::option::Opt;
use crate::parser::SyntaxParser;
use crate::registry::OptionRegistry;
use crate::token::Tokenizer;
use crate::usage::UsageDefinition;
use crate::validate::validate;
use posixopt_types::TypeRegistry;
use std::sync::Arc;

/// Option definitions plus the machinery to parse argument vectors
/// against them.
///
/// Definitions are added up front through `&mut self`; parsing only needs
/// `&self`, so a finished `GetOpt` can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct GetOpt {
    options: OptionRegistry,
    types: TypeRegistry,
    usage: UsageDefinition,
}

impl GetOpt {
    /// An empty definition using the built-in types.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(types: TypeRegistry) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    pub fn add_option(&mut self, opt: impl Into<Opt>) -> std::result::Result<Arc<Opt>, DefinitionError> {
        self.options.register(opt)
    }

    /// Restrict `command` to the given options.
    ///
    /// Both the command and the options may be referred to by any alias; the
    /// definition stores primary names.
    pub fn add_usage<I, S>(
        &mut self,
        command: &str,
        options: I,
    ) -> std::result::Result<&mut Self, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let command = self
            .options
            .find_command(command)
            .map(|c| c.name().to_string())
            .ok_or_else(|| DefinitionError::UnknownCommand(command.to_string()))?;

        let mut allowed = Vec::new();
        for option in options {
            let option = option.as_ref();
            let primary = self.options.primary_name(option).ok_or_else(|| {
                DefinitionError::UnknownOption {
                    command: command.clone(),
                    option: option.to_string(),
                }
            })?;
            allowed.push(primary.to_string());
        }

        self.usage.allow(&command, allowed);
        Ok(self)
    }

    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Register custom validators.
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn usage(&self) -> &UsageDefinition {
        &self.usage
    }

    /// Parse `args`, which must not include the program name.
    pub fn parse<I, S>(&self, args: I) -> Result<Input>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize(args);
        tracing::debug!(
            tokens = tokens.len(),
            terminated = tokenizer.is_terminated(),
            "tokenized arguments"
        );

        let result = SyntaxParser::new(&self.options).parse(tokens)?;
        let options = validate(&result, &self.options, &self.types, &self.usage)?;
        let non_options = result.overflow().to_vec();

        tracing::debug!(command = ?result.command, "parsed input");
        Ok(Input::new(result.command, options, non_options, &self.options))
    }

    /// Parse the current process arguments, skipping the program name.
    pub fn parse_env(&self) -> Result<Input> {
        self.parse(std::env::args().skip(1))
    }
}
