//! Option declaration and flag value types.
//!
//! An [`OptionSpec`] describes a single option the way it is declared:
//! a long name, an optional short letter, an optional argument
//! placeholder and a help line. [`FlagValue`] is what a declared option
//! resolves to after parsing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declaration of a single command option.
///
/// The long name doubles as the `--name` spelling and as the lookup key in
/// [`ParsedFlags`](crate::ParsedFlags). An option with an
/// [`argument`](OptionSpec::argument) placeholder requires a value; an
/// option without one is a boolean presence flag.
///
/// # Examples
///
/// ```
/// use optcommand_core::OptionSpec;
///
/// let help = OptionSpec::boolean("help", Some('h')).with_help("show this help information");
/// assert!(!help.takes_argument());
///
/// let file = OptionSpec::with_argument("file", Some('f'), "<filename>")
///     .with_help("use specified file");
/// assert!(file.takes_argument());
/// assert_eq!(file.option_column(), "-f <filename>, --file=<filename>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    /// Long name without the leading dashes (e.g. "file")
    pub long: String,
    /// Short letter without the leading dash (e.g. 'f')
    #[serde(
        default,
        deserialize_with = "deserialize_short",
        skip_serializing_if = "Option::is_none"
    )]
    pub short: Option<char>,
    /// Placeholder shown in usage when the option takes a value (e.g. "<filename>")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    /// Help line shown in the usage table
    #[serde(default)]
    pub help: String,
}

impl OptionSpec {
    /// Creates a boolean option (no argument).
    pub fn boolean(long: &str, short: Option<char>) -> Self {
        Self {
            long: long.to_string(),
            short,
            argument: None,
            help: String::new(),
        }
    }

    /// Creates an option that requires an argument, shown as `placeholder`.
    pub fn with_argument(long: &str, short: Option<char>, placeholder: &str) -> Self {
        Self {
            long: long.to_string(),
            short,
            argument: Some(placeholder.to_string()),
            help: String::new(),
        }
    }

    /// Sets the help line.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Returns `true` if the option requires a value.
    pub fn takes_argument(&self) -> bool {
        self.argument.is_some()
    }

    /// Renders the left-hand column of this option's usage line.
    ///
    /// # Examples
    ///
    /// ```
    /// use optcommand_core::OptionSpec;
    ///
    /// assert_eq!(OptionSpec::boolean("help", Some('h')).option_column(), "-h, --help");
    /// assert_eq!(OptionSpec::boolean("version", None).option_column(), "--version");
    /// assert_eq!(
    ///     OptionSpec::with_argument("file", None, "<filename>").option_column(),
    ///     "--file=<filename>"
    /// );
    /// ```
    pub fn option_column(&self) -> String {
        match (self.short, self.argument.as_deref()) {
            (Some(short), Some(arg)) => format!("-{short} {arg}, --{}={arg}", self.long),
            (Some(short), None) => format!("-{short}, --{}", self.long),
            (None, Some(arg)) => format!("--{}={arg}", self.long),
            (None, None) => format!("--{}", self.long),
        }
    }

    /// Width of [`option_column`](OptionSpec::option_column) in characters.
    pub fn column_width(&self) -> usize {
        let arg_len = self.argument.as_deref().map_or(0, |a| a.chars().count());
        let mut width = self.long.chars().count() + 2;
        if self.short.is_some() {
            width += 4;
            if self.argument.is_some() {
                width += arg_len + 1;
            }
        }
        if self.argument.is_some() {
            width += arg_len + 1;
        }
        width
    }
}

// Declaration files spell "no short form" as an empty string.
fn deserialize_short<'de, D>(deserializer: D) -> Result<Option<char>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => Ok(Some(c)),
        _ => Err(serde::de::Error::custom(format!(
            "short option must be a single character, got \"{raw}\""
        ))),
    }
}

/// Resolved value of a declared option.
///
/// Serializes as JSON `null`, `true`, or the supplied string.
///
/// # Examples
///
/// ```
/// use optcommand_core::FlagValue;
///
/// assert!(FlagValue::Present.is_set());
/// assert_eq!(FlagValue::Value("/tmp/x".into()).as_str(), Some("/tmp/x"));
/// assert!(!FlagValue::default().is_set());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagValue {
    /// Declared but not supplied.
    #[default]
    Absent,
    /// Boolean option supplied.
    Present,
    /// Argument-taking option supplied with this value.
    Value(String),
}

impl FlagValue {
    /// Returns `true` unless the flag is [`Absent`](FlagValue::Absent).
    pub fn is_set(&self) -> bool {
        !matches!(self, FlagValue::Absent)
    }

    /// Returns the supplied argument, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FlagValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for FlagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FlagValue::Absent => serializer.serialize_none(),
            FlagValue::Present => serializer.serialize_bool(true),
            FlagValue::Value(value) => serializer.serialize_str(value),
        }
    }
}
