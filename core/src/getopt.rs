//! POSIX getopt with GNU-style long options.
//!
//! Scanning is non-permuting: it stops at the first operand (a token that
//! does not start with `-`, or a lone `-`) and consumes a `--` terminator.
//! Short options may be bundled (`-hf value`, `-fvalue`); long options take
//! their value as `--name=value` or `--name value` and may be abbreviated
//! to any unique prefix.
//!
//! # Examples
//!
//! ```
//! use optcommand_core::{OptionName, getopt};
//!
//! let longopts = vec!["help".to_string(), "file=".to_string()];
//! let matches = getopt(&["-hf", "a.txt", "build"], "hf:", &longopts).unwrap();
//!
//! assert_eq!(matches.options[0].name, OptionName::Short('h'));
//! assert_eq!(matches.options[1].value.as_deref(), Some("a.txt"));
//! assert_eq!(matches.operands, vec!["build"]);
//! ```

use std::fmt;

use thiserror::Error;
use tracing::trace;

/// Error raised while scanning options.
///
/// Parsers store this instead of returning it; see
/// [`CommandParser::error`](crate::CommandParser::error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionParseError {
    /// `-x` is not declared.
    #[error("option -{0} not recognized")]
    UnrecognizedShort(char),
    /// `--name` matches no declared long option.
    #[error("option --{0} not recognized")]
    UnrecognizedLong(String),
    /// `-x` requires an argument but none followed.
    #[error("option -{0} requires argument")]
    ShortRequiresArgument(char),
    /// `--name` requires an argument but none followed.
    #[error("option --{0} requires argument")]
    LongRequiresArgument(String),
    /// `--name=value` given for a boolean option.
    #[error("option --{0} must not have an argument")]
    UnexpectedArgument(String),
    /// `--prefix` abbreviates more than one long option.
    #[error("option --{0} not a unique prefix")]
    AmbiguousPrefix(String),
}

impl OptionParseError {
    /// The offending option as typed, without dashes.
    pub fn option(&self) -> String {
        match self {
            Self::UnrecognizedShort(c) | Self::ShortRequiresArgument(c) => c.to_string(),
            Self::UnrecognizedLong(name)
            | Self::LongRequiresArgument(name)
            | Self::UnexpectedArgument(name)
            | Self::AmbiguousPrefix(name) => name.clone(),
        }
    }
}

/// Name of a scanned option, as spelled on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionName {
    Short(char),
    /// Full long name, with any abbreviation already expanded.
    Long(String),
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionName::Short(c) => write!(f, "-{c}"),
            OptionName::Long(name) => write!(f, "--{name}"),
        }
    }
}

/// One scanned option and its argument, if it takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption {
    pub name: OptionName,
    pub value: Option<String>,
}

/// Options in command-line order plus the remaining operands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetoptMatches {
    pub options: Vec<ParsedOption>,
    pub operands: Vec<String>,
}

/// Scans `args` against a getopt short spec and a long option list.
///
/// `shortopts` lists option letters, each followed by `:` when it takes an
/// argument. `longopts` lists long names, each followed by `=` when it takes
/// an argument.
///
/// # Errors
///
/// Returns the first [`OptionParseError`] encountered; nothing scanned
/// before it is returned.
pub fn getopt<S: AsRef<str>>(
    args: &[S],
    shortopts: &str,
    longopts: &[String],
) -> Result<GetoptMatches, OptionParseError> {
    let mut options = Vec::new();
    let mut idx = 0;

    while idx < args.len() {
        let arg = args[idx].as_ref();
        if arg == "--" {
            idx += 1;
            break;
        }
        if !arg.starts_with('-') || arg == "-" {
            break;
        }
        idx += 1;

        if let Some(long) = arg.strip_prefix("--") {
            options.push(scan_long(long, longopts, args, &mut idx)?);
        } else {
            scan_shorts(&arg[1..], shortopts, args, &mut idx, &mut options)?;
        }
    }

    let operands = args[idx..]
        .iter()
        .map(|a| a.as_ref().to_string())
        .collect::<Vec<_>>();
    trace!(
        options = options.len(),
        operands = operands.len(),
        "getopt scan complete"
    );

    Ok(GetoptMatches { options, operands })
}

fn next_arg<S: AsRef<str>>(args: &[S], idx: &mut usize) -> Option<String> {
    let value = args.get(*idx).map(|a| a.as_ref().to_string())?;
    *idx += 1;
    Some(value)
}

fn scan_long<S: AsRef<str>>(
    token: &str,
    longopts: &[String],
    args: &[S],
    idx: &mut usize,
) -> Result<ParsedOption, OptionParseError> {
    let (typed, mut value) = match token.split_once('=') {
        Some((name, value)) => (name, Some(value.to_string())),
        None => (token, None),
    };
    let (name, takes_argument) = resolve_long(typed, longopts)?;

    if takes_argument {
        if value.is_none() {
            value = Some(
                next_arg(args, idx)
                    .ok_or_else(|| OptionParseError::LongRequiresArgument(name.clone()))?,
            );
        }
    } else if value.is_some() {
        return Err(OptionParseError::UnexpectedArgument(name));
    }

    trace!(option = %name, "scanned long option");
    Ok(ParsedOption {
        name: OptionName::Long(name),
        value,
    })
}

// Exact matches win over prefix matches; otherwise the prefix must be unique.
fn resolve_long(typed: &str, longopts: &[String]) -> Result<(String, bool), OptionParseError> {
    let candidates = longopts
        .iter()
        .map(String::as_str)
        .filter(|o| o.starts_with(typed))
        .collect::<Vec<_>>();

    if candidates.is_empty() {
        return Err(OptionParseError::UnrecognizedLong(typed.to_string()));
    }
    if candidates.contains(&typed) {
        return Ok((typed.to_string(), false));
    }
    if candidates.iter().any(|c| c.strip_suffix('=') == Some(typed)) {
        return Ok((typed.to_string(), true));
    }
    if candidates.len() > 1 {
        return Err(OptionParseError::AmbiguousPrefix(typed.to_string()));
    }

    let unique = candidates[0];
    Ok(match unique.strip_suffix('=') {
        Some(name) => (name.to_string(), true),
        None => (unique.to_string(), false),
    })
}

fn scan_shorts<S: AsRef<str>>(
    bundle: &str,
    shortopts: &str,
    args: &[S],
    idx: &mut usize,
    options: &mut Vec<ParsedOption>,
) -> Result<(), OptionParseError> {
    for (pos, letter) in bundle.char_indices() {
        if !short_takes_argument(letter, shortopts)? {
            options.push(ParsedOption {
                name: OptionName::Short(letter),
                value: None,
            });
            continue;
        }

        // The rest of the bundle is the argument, or else the next token.
        let rest = &bundle[pos + letter.len_utf8()..];
        let value = if rest.is_empty() {
            next_arg(args, idx).ok_or(OptionParseError::ShortRequiresArgument(letter))?
        } else {
            rest.to_string()
        };
        options.push(ParsedOption {
            name: OptionName::Short(letter),
            value: Some(value),
        });
        break;
    }
    Ok(())
}

fn short_takes_argument(letter: char, shortopts: &str) -> Result<bool, OptionParseError> {
    let mut chars = shortopts.chars().peekable();
    while let Some(c) = chars.next() {
        if c == letter && c != ':' {
            return Ok(chars.peek() == Some(&':'));
        }
    }
    Err(OptionParseError::UnrecognizedShort(letter))
}
