//! POSIX/GNU style command-line parsing.
//!
//! A [`GetOpt`] holds option definitions ([`Command`], [`Flag`], [`Param`]
//! and [`Term`]) and turns an argument vector into an [`Input`]:
//!
//! ```
//! use posixopt::{Command, Flag, GetOpt, Param, Term};
//!
//! let mut getopt = GetOpt::new();
//! getopt.add_option(Command::new("add")).unwrap();
//! getopt.add_option(Term::new("username")).unwrap();
//! getopt.add_option(Param::new("password").alias("p").required(true)).unwrap();
//! getopt.add_option(Flag::new("verbose").alias("v")).unwrap();
//! getopt.add_usage("add", ["username", "password", "verbose"]).unwrap();
//!
//! let input = getopt.parse(["add", "alice", "-p", "secret", "-v"]).unwrap();
//! assert_eq!(input.command(), Some("add"));
//! assert_eq!(input.get_str("username"), Some("alice"));
//! assert_eq!(input.get_bool("v"), Some(true));
//! ```
//!
//! Parsing runs in three stages, each usable on its own: [`tokenize`],
//! [`SyntaxParser::parse`] and validation against the [`TypeRegistry`].

mod error;
mod getopt;
pub mod help;
mod input;
mod option;
mod parser;
mod registry;
mod token;
mod usage;
mod validate;

pub use error::{
    DefinitionError, Error, INTERRUPT_EXIT_CODE, Result, USAGE_EXIT_CODE, UsageError,
    VALIDATION_EXIT_CODE, ValidationError,
};
pub use getopt::GetOpt;
pub use help::HelpMeta;
pub use input::Input;
pub use option::{Command, Filter, Flag, Opt, Param, Term};
pub use parser::{MappedValue, ParsingResult, SyntaxParser};
pub use registry::{OVERFLOW_KEY, OptionRegistry, normalize};
pub use token::{Token, TokenKind, Tokenized, Tokenizer, tokenize};
pub use usage::UsageDefinition;
pub use validate::validate;

pub use posixopt_types::{TypeRegistry, TypedValue, Validator, names};
