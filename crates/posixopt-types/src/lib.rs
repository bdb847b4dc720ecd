//! Typed value validation for posixopt.
//!
//! Every option value arrives as a string. Before it reaches the caller it is
//! passed through a [`Validator`] looked up by name in a [`TypeRegistry`]:
//! - the built-in validators cover strings, numbers, booleans, e-mail
//!   addresses, URLs, ISO dates and semantic versions
//! - applications can register their own validators (closures work too)

mod error;
mod registry;
mod validators;
mod value;

pub use error::{VALIDATION_EXIT_CODE, ValidationError};
pub use registry::TypeRegistry;
pub use validators::{boolean, date, email, float, integer, string, url, version};
pub use value::TypedValue;

/// Names of the built-in types.
pub mod names {
    pub const STRING: &str = "string";
    pub const INTEGER: &str = "integer";
    pub const FLOAT: &str = "float";
    pub const BOOLEAN: &str = "boolean";
    pub const EMAIL: &str = "email";
    pub const URL: &str = "url";
    pub const DATE: &str = "date";
    pub const VERSION: &str = "version";
}

/// Converts a raw argument string into a [`TypedValue`].
pub trait Validator: Send + Sync {
    fn validate(&self, raw: &str) -> Result<TypedValue, ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&str) -> Result<TypedValue, ValidationError> + Send + Sync,
{
    fn validate(&self, raw: &str) -> Result<TypedValue, ValidationError> {
        self(raw)
    }
}
