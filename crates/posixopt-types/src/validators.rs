//! Built-in validators.
//!
//! Each function has the [`Validator`](crate::Validator) shape and can be
//! registered directly.

use crate::{TypedValue, ValidationError};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

pub fn string(raw: &str) -> Result<TypedValue, ValidationError> {
    Ok(TypedValue::Str(raw.to_string()))
}

pub fn integer(raw: &str) -> Result<TypedValue, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map(TypedValue::Int)
        .map_err(|_| ValidationError::new(format!("'{raw}' is not a valid integer")))
}

pub fn float(raw: &str) -> Result<TypedValue, ValidationError> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::new(format!("'{raw}' is not a valid number")))?;
    if !parsed.is_finite() {
        return Err(ValidationError::new(format!("'{raw}' is not a finite number")));
    }
    Ok(TypedValue::Float(parsed))
}

pub fn boolean(raw: &str) -> Result<TypedValue, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(TypedValue::Bool(true)),
        "false" | "0" | "no" | "off" => Ok(TypedValue::Bool(false)),
        _ => Err(ValidationError::new(format!(
            "'{raw}' is not a valid boolean"
        ))),
    }
}

pub fn email(raw: &str) -> Result<TypedValue, ValidationError> {
    if EMAIL_RE.is_match(raw) {
        Ok(TypedValue::Str(raw.to_string()))
    } else {
        Err(ValidationError::new(format!(
            "'{raw}' is not a valid e-mail address"
        )))
    }
}

pub fn url(raw: &str) -> Result<TypedValue, ValidationError> {
    ::url::Url::parse(raw)
        .map(TypedValue::Url)
        .map_err(|e| ValidationError::new(format!("'{raw}' is not a valid URL: {e}")))
}

/// ISO 8601 calendar date (`YYYY-MM-DD`).
pub fn date(raw: &str) -> Result<TypedValue, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(TypedValue::Date)
        .map_err(|_| ValidationError::new(format!("'{raw}' is not a valid date (YYYY-MM-DD)")))
}

pub fn version(raw: &str) -> Result<TypedValue, ValidationError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    semver::Version::parse(trimmed)
        .map(TypedValue::Version)
        .map_err(|e| ValidationError::new(format!("'{raw}' is not a valid version: {e}")))
}
