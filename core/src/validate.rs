//! Option table validation.
//!
//! Catches declarations that would make parsing ambiguous or impossible
//! (empty or duplicate names, letters getopt reserves) before a table is
//! handed to a parser.
//!
//! # Examples
//!
//! ```
//! use optcommand_core::*;
//!
//! let specs = vec![OptionSpec::boolean("help", Some('h'))];
//! assert!(validate_options(&specs).is_empty());
//!
//! // Invalid: two options claim `-h`
//! let specs = vec![
//!     OptionSpec::boolean("help", Some('h')),
//!     OptionSpec::boolean("host", Some('h')),
//! ];
//! assert_eq!(validate_options(&specs), vec![ValidationError::DuplicateShort('h')]);
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::OptionSpec;

/// Option table validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Long name is empty or whitespace-only.
    #[error("long option name cannot be empty")]
    EmptyLongName,
    /// Long name starts with a dash or contains `=` or whitespace.
    #[error("invalid long option name: {0}")]
    InvalidLongName(String),
    /// Short letter is `-`, `:` or whitespace.
    #[error("invalid short option: {0:?}")]
    InvalidShort(char),
    /// Two options share a long name.
    #[error("duplicate long option: --{0}")]
    DuplicateLong(String),
    /// Two options share a short letter.
    #[error("duplicate short option: -{0}")]
    DuplicateShort(char),
}

/// Validates an ordered list of option declarations.
///
/// Stops at the first problem found, so the result holds at most one
/// error.
pub fn validate_options(specs: &[OptionSpec]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_long: HashSet<&str> = HashSet::new();
    let mut seen_short: HashSet<char> = HashSet::new();

    for spec in specs {
        let long = spec.long.as_str();
        if long.trim().is_empty() {
            errors.push(ValidationError::EmptyLongName);
            return errors;
        }
        if long.starts_with('-') || long.contains('=') || long.chars().any(char::is_whitespace) {
            errors.push(ValidationError::InvalidLongName(long.to_string()));
            return errors;
        }
        if !seen_long.insert(long) {
            errors.push(ValidationError::DuplicateLong(long.to_string()));
            return errors;
        }

        if let Some(short) = spec.short {
            if short == '-' || short == ':' || short.is_whitespace() {
                errors.push(ValidationError::InvalidShort(short));
                return errors;
            }
            if !seen_short.insert(short) {
                errors.push(ValidationError::DuplicateShort(short));
                return errors;
            }
        }
    }

    errors
}
