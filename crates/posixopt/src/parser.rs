//! Syntactic pass: tokens to a [`ParsingResult`].
//!
//! The parser resolves option names against the [`OptionRegistry`], pairs
//! value-taking options with their values, picks out the command and finally
//! hands operands to terms in registration order. Values stay raw strings;
//! typing happens in [`crate::validate`].

use crate::error::{Error, Result};
use crate::option::Opt;
use crate::registry::{OVERFLOW_KEY, OptionRegistry};
use crate::token::{Token, TokenKind};
use indexmap::IndexMap;
use std::sync::Arc;

/// Loosely typed value recorded by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedValue {
    Flag(bool),
    Raw(String),
    /// Operands no term claimed, stored under [`OVERFLOW_KEY`].
    Overflow(Vec<String>),
}

/// Intermediate result of one parse, keyed by primary option names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsingResult {
    pub command: Option<String>,
    pub mapped: IndexMap<String, MappedValue>,
    /// Unvalidated strings, one per provided option or filled term.
    pub raw_values: IndexMap<String, String>,
    /// Operands in order, before term assignment.
    pub operands: Vec<String>,
}

impl ParsingResult {
    /// Operands left over after every term was filled.
    pub fn overflow(&self) -> &[String] {
        match self.mapped.get(OVERFLOW_KEY) {
            Some(MappedValue::Overflow(rest)) => rest.as_slice(),
            _ => &[],
        }
    }

    fn set_command(&mut self, opt: &Opt) -> Result<()> {
        if self.command.is_some() {
            return Err(Error::usage("Multiple commands specified"));
        }
        self.record_command(opt);
        Ok(())
    }

    fn record_command(&mut self, opt: &Opt) {
        self.command = Some(opt.name().to_string());
        self.mapped
            .insert(opt.name().to_string(), MappedValue::Flag(true));
    }

    fn record_flag(&mut self, opt: &Opt) {
        self.mapped
            .insert(opt.name().to_string(), MappedValue::Flag(true));
        self.raw_values
            .insert(opt.name().to_string(), "true".to_string());
    }

    fn record_value(&mut self, opt: &Opt, value: String) {
        self.mapped
            .insert(opt.name().to_string(), MappedValue::Raw(value.clone()));
        self.raw_values.insert(opt.name().to_string(), value);
    }
}

fn requires_value(opt: &Opt) -> Error {
    Error::usage(format!("Option '{}' requires a value", opt.name()))
}

/// Scratch state for a single [`SyntaxParser::parse`] call.
#[derive(Default)]
struct ParseState {
    result: ParsingResult,
    pending: Option<Arc<Opt>>,
    operand_only: bool,
}

/// Applies POSIX grammar rules to a token stream.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxParser<'r> {
    registry: &'r OptionRegistry,
}

impl<'r> SyntaxParser<'r> {
    pub fn new(registry: &'r OptionRegistry) -> Self {
        Self { registry }
    }

    pub fn parse<I>(&self, tokens: I) -> Result<ParsingResult>
    where
        I: IntoIterator<Item = Token>,
    {
        let mut state = ParseState::default();

        for token in tokens {
            if let Some(opt) = state.pending.take() {
                if token.kind != TokenKind::Operand {
                    return Err(requires_value(&opt));
                }
                state.result.record_value(&opt, token.value);
                continue;
            }

            if state.operand_only {
                self.operand(&mut state, token.value);
                continue;
            }

            match token.kind {
                TokenKind::Terminator => state.operand_only = true,
                TokenKind::Operand => self.operand(&mut state, token.value),
                TokenKind::LongOption => self.long_option(&mut state, token)?,
                TokenKind::ShortOption => self.short_option(&mut state, token)?,
            }
        }

        if let Some(opt) = state.pending {
            return Err(requires_value(&opt));
        }

        let mut result = state.result;
        self.assign_terms(&mut result);
        tracing::debug!(
            command = ?result.command,
            options = result.raw_values.len(),
            operands = result.operands.len(),
            "syntax parse complete"
        );
        Ok(result)
    }

    fn operand(&self, state: &mut ParseState, value: String) {
        if state.result.command.is_none() {
            if let Some(command) = self.registry.find_command(&value) {
                state.result.record_command(command);
                return;
            }
        }
        state.result.operands.push(value);
    }

    fn long_option(&self, state: &mut ParseState, token: Token) -> Result<()> {
        let opt = self
            .registry
            .find(&token.value)
            .ok_or_else(|| Error::usage(format!("Unknown option '--{}'", token.value)))?;

        if opt.accepts_value() {
            match token.attached {
                Some(value) => state.result.record_value(opt, value),
                None => state.pending = Some(Arc::clone(opt)),
            }
            return Ok(());
        }

        if token.attached.is_some() {
            return Err(Error::usage(format!(
                "Option '--{}' does not accept a value",
                token.value
            )));
        }
        Self::switch(state, opt)
    }

    fn short_option(&self, state: &mut ParseState, token: Token) -> Result<()> {
        let opt = self
            .registry
            .find(&token.value)
            .ok_or_else(|| Error::usage(format!("Unknown option '-{}'", token.value)))?;

        if opt.accepts_value() {
            match token.attached {
                Some(value) => state.result.record_value(opt, value),
                None => state.pending = Some(Arc::clone(opt)),
            }
            return Ok(());
        }

        Self::switch(state, opt)?;
        match token.attached {
            Some(cluster) => self.expand_cluster(state, &cluster),
            None => Ok(()),
        }
    }

    /// Treat the text attached to a non-value short option as more short
    /// options (`-vrf`). The first value-taking option in the cluster takes
    /// the remainder, or the next token when nothing remains.
    fn expand_cluster(&self, state: &mut ParseState, cluster: &str) -> Result<()> {
        for (idx, c) in cluster.char_indices() {
            let name = c.to_string();
            let opt = self
                .registry
                .find(&name)
                .ok_or_else(|| Error::usage(format!("Unknown option '-{name}'")))?;

            if opt.accepts_value() {
                let rest = &cluster[idx + c.len_utf8()..];
                if rest.is_empty() {
                    state.pending = Some(Arc::clone(opt));
                } else {
                    state.result.record_value(opt, rest.to_string());
                }
                return Ok(());
            }
            Self::switch(state, opt)?;
        }
        Ok(())
    }

    /// Record a command or flag occurrence.
    fn switch(state: &mut ParseState, opt: &Opt) -> Result<()> {
        if opt.is_command() {
            state.result.set_command(opt)
        } else {
            state.result.record_flag(opt);
            Ok(())
        }
    }

    fn assign_terms(&self, result: &mut ParsingResult) {
        let mut free_terms = self
            .registry
            .terms()
            .iter()
            .filter(|term| !result.raw_values.contains_key(term.name()))
            .cloned()
            .collect::<Vec<_>>()
            .into_iter();

        let mut overflow = Vec::new();
        for operand in &result.operands {
            match free_terms.next() {
                Some(term) => {
                    result
                        .mapped
                        .insert(term.name().to_string(), MappedValue::Raw(operand.clone()));
                    result
                        .raw_values
                        .insert(term.name().to_string(), operand.clone());
                }
                None => overflow.push(operand.clone()),
            }
        }

        if !overflow.is_empty() {
            result
                .mapped
                .insert(OVERFLOW_KEY.to_string(), MappedValue::Overflow(overflow));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::{Command, Flag, Param, Term};
    use crate::token::tokenize;

    fn registry() -> OptionRegistry {
        let mut registry = OptionRegistry::new();
        registry.register(Command::new("add")).unwrap();
        registry.register(Command::new("remove").alias("rm")).unwrap();
        registry.register(Term::new("username")).unwrap();
        registry
            .register(Param::new("password").alias("p"))
            .unwrap();
        registry.register(Flag::new("verbose").alias("v")).unwrap();
        registry.register(Flag::new("recursive").alias("r")).unwrap();
        registry.register(Flag::new("force").alias("f")).unwrap();
        registry
    }

    fn parse(registry: &OptionRegistry, args: &[&str]) -> Result<ParsingResult> {
        SyntaxParser::new(registry).parse(tokenize(args).tokens)
    }

    #[test]
    fn command_term_param_and_flag() {
        let registry = registry();
        let result = parse(&registry, &["add", "alice", "-p", "secret", "-v"]).unwrap();
        assert_eq!(result.command.as_deref(), Some("add"));
        assert_eq!(result.operands, ["alice"]);
        assert_eq!(result.raw_values.get("username").map(String::as_str), Some("alice"));
        assert_eq!(result.raw_values.get("password").map(String::as_str), Some("secret"));
        assert_eq!(result.raw_values.get("verbose").map(String::as_str), Some("true"));
        assert_eq!(result.mapped.get("verbose"), Some(&MappedValue::Flag(true)));
        assert_eq!(result.mapped.get("add"), Some(&MappedValue::Flag(true)));
        assert!(!result.raw_values.contains_key("add"));
    }

    #[test]
    fn attached_values() {
        let registry = registry();
        let result = parse(&registry, &["--password=hunter2"]).unwrap();
        assert_eq!(result.raw_values["password"], "hunter2");

        let result = parse(&registry, &["-psecret"]).unwrap();
        assert_eq!(result.raw_values["password"], "secret");

        let result = parse(&registry, &["--password", "--"]).unwrap_err();
        assert_eq!(result.message(), "Option 'password' requires a value");
    }

    #[test]
    fn unknown_options_name_their_form() {
        let registry = registry();
        let err = parse(&registry, &["--bogus"]).unwrap_err();
        assert_eq!(err.message(), "Unknown option '--bogus'");
        assert!(err.is_client_error());

        let err = parse(&registry, &["-x"]).unwrap_err();
        assert_eq!(err.message(), "Unknown option '-x'");
    }

    #[test]
    fn missing_value_at_end_of_input() {
        let registry = registry();
        let err = parse(&registry, &["-p"]).unwrap_err();
        assert_eq!(err.message(), "Option 'password' requires a value");

        let err = parse(&registry, &["-p", "-v"]).unwrap_err();
        assert_eq!(err.message(), "Option 'password' requires a value");
    }

    #[test]
    fn multiple_commands() {
        let registry = registry();
        let err = parse(&registry, &["add", "--remove"]).unwrap_err();
        assert_eq!(err.message(), "Multiple commands specified");

        // A second command name given as an operand is just an operand.
        let result = parse(&registry, &["add", "rm"]).unwrap();
        assert_eq!(result.command.as_deref(), Some("add"));
        assert_eq!(result.raw_values["username"], "rm");
    }

    #[test]
    fn command_may_follow_operands_and_use_aliases() {
        let registry = registry();
        let result = parse(&registry, &["alice", "RM"]).unwrap();
        assert_eq!(result.command.as_deref(), Some("remove"));
        assert_eq!(result.operands, ["alice"]);
    }

    #[test]
    fn terminator_makes_option_lookalikes_operands() {
        let registry = registry();
        let result = parse(&registry, &["--", "-v", "--bogus"]).unwrap();
        assert!(!result.raw_values.contains_key("verbose"));
        assert_eq!(result.raw_values["username"], "-v");
        assert_eq!(result.overflow(), ["--bogus"]);
    }

    #[test]
    fn overflow_operands() {
        let registry = registry();
        let result = parse(&registry, &["alice", "bob", "carol"]).unwrap();
        assert_eq!(result.raw_values["username"], "alice");
        assert_eq!(
            result.mapped.get(OVERFLOW_KEY),
            Some(&MappedValue::Overflow(vec!["bob".to_string(), "carol".to_string()]))
        );
    }

    #[test]
    fn named_term_is_not_refilled_from_operands() {
        let registry = registry();
        let result = parse(&registry, &["--username", "bob", "alice"]).unwrap();
        assert_eq!(result.raw_values["username"], "bob");
        assert_eq!(result.overflow(), ["alice"]);
    }

    #[test]
    fn flag_clusters_expand_against_the_registry() {
        let registry = registry();
        let result = parse(&registry, &["-vrf"]).unwrap();
        for name in ["verbose", "recursive", "force"] {
            assert_eq!(result.mapped.get(name), Some(&MappedValue::Flag(true)), "{name}");
        }

        let result = parse(&registry, &["-vpsecret"]).unwrap();
        assert_eq!(result.raw_values["password"], "secret");

        let result = parse(&registry, &["-vp", "secret"]).unwrap();
        assert_eq!(result.raw_values["password"], "secret");

        let err = parse(&registry, &["-vx"]).unwrap_err();
        assert_eq!(err.message(), "Unknown option '-x'");
    }

    #[test]
    fn padded_names_are_unknown() {
        let registry = registry();
        let err = parse(&registry, &["--\tverbose "]).unwrap_err();
        assert_eq!(err.message(), "Unknown option '--\tverbose '");

        let err = parse(&registry, &["-- password", "x"]).unwrap_err();
        assert_eq!(err.message(), "Unknown option '-- password'");
    }

    #[test]
    fn long_flag_rejects_attached_value() {
        let registry = registry();
        let err = parse(&registry, &["--verbose=yes"]).unwrap_err();
        assert_eq!(err.message(), "Option '--verbose' does not accept a value");
    }

    #[test]
    fn numeric_cluster_is_not_a_value() {
        let mut registry = registry();
        registry.register(Param::new("o")).unwrap();
        // `-o123` clusters to o,1,2,3 so `o` never gets its value.
        let err = parse(&registry, &["-o123"]).unwrap_err();
        assert_eq!(err.message(), "Option 'o' requires a value");
    }

    #[test]
    fn last_value_wins() {
        let registry = registry();
        let result = parse(&registry, &["-p", "one", "--password", "two"]).unwrap();
        assert_eq!(result.raw_values["password"], "two");
    }
}
