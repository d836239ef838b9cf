//! Command definitions and the per-invocation command parser.
//!
//! A [`CommandDef`] is the declarative half: usage line, description,
//! option table, trailing usage text and the registry of subcommands.
//! A [`CommandParser`] is built once per argv slice from a definition and
//! holds the outcome of parsing that slice.

use std::collections::BTreeMap;

use tracing::debug;

use crate::flags::{ParsedFlags, UndeclaredOptionError};
use crate::getopt::{OptionName, OptionParseError, getopt};
use crate::{FlagValue, OptionTable};

/// Usage line used when a definition does not set one.
pub const DEFAULT_USAGE: &str = "usage: command [options]";

/// Declaration of a command and its subcommands.
///
/// Each definition owns its option table and subcommand registry; parsers
/// only borrow them.
///
/// # Examples
///
/// ```
/// use optcommand_core::{CommandDef, OptionSpec, OptionTable};
///
/// let def = CommandDef::new("usage: basic-example [options]")
///     .with_description("small description")
///     .with_options(
///         OptionTable::new(vec![
///             OptionSpec::boolean("help", Some('h')).with_help("show this help information"),
///         ])
///         .unwrap(),
///     );
///
/// assert_eq!(
///     def.usage_text(),
///     "usage: basic-example [options]\n\nsmall description\n\nOptions:\n-h, --help  show this help information\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDef {
    /// Usage synopsis, used verbatim as the first line of the usage text
    pub usage: String,
    /// Short description shown below the synopsis
    pub description: String,
    /// Declared options
    pub options: OptionTable,
    /// Extra text appended after the options section
    pub extra: String,
    /// Subcommand registry, in declaration order
    pub commands: Vec<(String, CommandDef)>,
}

impl Default for CommandDef {
    fn default() -> Self {
        Self::new(DEFAULT_USAGE)
    }
}

impl CommandDef {
    /// Creates a definition with the given usage line and nothing else.
    pub fn new(usage: &str) -> Self {
        Self {
            usage: usage.to_string(),
            description: String::new(),
            options: OptionTable::empty(),
            extra: String::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_options(mut self, options: OptionTable) -> Self {
        self.options = options;
        self
    }

    pub fn with_extra(mut self, extra: &str) -> Self {
        self.extra = extra.to_string();
        self
    }

    /// Registers a subcommand, replacing any earlier one with the same name.
    pub fn with_command(mut self, name: &str, command: CommandDef) -> Self {
        match self.commands.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = command,
            None => self.commands.push((name.to_string(), command)),
        }
        self
    }

    /// Finds a registered subcommand by name.
    pub fn find_command(&self, name: &str) -> Option<&CommandDef> {
        self.commands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, def)| def)
    }

    /// Gets all subcommand names.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Composes the full usage text.
    ///
    /// Sections with no content are left out entirely.
    pub fn usage_text(&self) -> String {
        let mut text = self.usage.clone();
        if !self.description.is_empty() {
            text.push_str("\n\n");
            text.push_str(&self.description);
        }
        if !self.options.is_empty() {
            text.push_str("\n\nOptions:\n");
            text.push_str(&self.options.usage_table());
        }
        if !self.extra.is_empty() {
            // Option lines already end in a newline.
            text.push_str(if self.options.is_empty() { "\n\n" } else { "\n" });
            text.push_str(&self.extra);
        }
        text
    }
}

/// Parse state for one argv slice.
///
/// Construction never fails: a bad option is recorded in
/// [`error`](CommandParser::error), in which case every flag stays
/// [`Absent`](FlagValue::Absent) and no positional arguments are kept.
///
/// # Examples
///
/// ```
/// use optcommand_core::{CommandDef, CommandParser, FlagValue, OptionSpec, OptionTable};
///
/// let def = CommandDef::new("usage: tool [options]").with_options(
///     OptionTable::new(vec![
///         OptionSpec::boolean("help", Some('h')),
///         OptionSpec::with_argument("file", Some('f'), "<filename>"),
///     ])
///     .unwrap(),
/// );
///
/// let parser = CommandParser::new(&def, &["-f", "/tmp/x", "rest"]);
/// assert!(parser.error().is_none());
/// assert_eq!(parser.flags()["file"], FlagValue::Value("/tmp/x".into()));
/// assert_eq!(parser.flags()["help"], FlagValue::Absent);
/// assert_eq!(parser.args(), ["rest"]);
///
/// let failed = CommandParser::new(&def, &["-f", "x", "--nope"]);
/// assert!(failed.error().is_some());
/// assert_eq!(failed.flags()["file"], FlagValue::Absent);
/// ```
#[derive(Debug, Clone)]
pub struct CommandParser<'a> {
    def: &'a CommandDef,
    name: Option<&'a str>,
    flags: ParsedFlags,
    args: Vec<String>,
    usage: String,
    error: Option<OptionParseError>,
    parent_flags: BTreeMap<String, FlagValue>,
}

impl<'a> CommandParser<'a> {
    /// Parses `argv` (without the program name) against `def`.
    pub fn new<S: AsRef<str>>(def: &'a CommandDef, argv: &[S]) -> Self {
        Self::build(def, None, argv)
    }

    pub(crate) fn build<S: AsRef<str>>(
        def: &'a CommandDef,
        name: Option<&'a str>,
        argv: &[S],
    ) -> Self {
        let mut parser = Self {
            def,
            name,
            flags: ParsedFlags::declared(&def.options),
            args: Vec::new(),
            usage: def.usage_text(),
            error: None,
            parent_flags: BTreeMap::new(),
        };

        let matches = match getopt(argv, &def.options.short_spec(), &def.options.long_spec()) {
            Ok(matches) => matches,
            Err(err) => {
                debug!(command = name.unwrap_or("<main>"), error = %err, "option parsing failed");
                parser.error = Some(err);
                return parser;
            }
        };

        for option in matches.options {
            let spec = match &option.name {
                OptionName::Short(letter) => def.options.find_short(*letter),
                OptionName::Long(long) => def.options.find_long(long),
            };
            let Some(spec) = spec else {
                continue;
            };
            let value = if spec.takes_argument() {
                FlagValue::Value(option.value.unwrap_or_default())
            } else {
                FlagValue::Present
            };
            debug!(option = %option.name, flag = %spec.long, "flag set");
            parser.flags.set(&spec.long, value);
        }
        parser.args = matches.operands;
        parser
    }

    /// Definition this parser was built from.
    pub fn definition(&self) -> &'a CommandDef {
        self.def
    }

    /// Name this parser was dispatched under; `None` for a top-level parser.
    pub fn name(&self) -> Option<&'a str> {
        self.name
    }

    pub fn flags(&self) -> &ParsedFlags {
        &self.flags
    }

    /// Shorthand for `self.flags().get(name)`.
    pub fn flag(&self, name: &str) -> Result<&FlagValue, UndeclaredOptionError> {
        self.flags.get(name)
    }

    /// Positional arguments left after option scanning.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full usage text of the definition.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Option parsing error, if argv held a bad option.
    pub fn error(&self) -> Option<&OptionParseError> {
        self.error.as_ref()
    }

    /// Stores a value forwarded from a parent command.
    ///
    /// Overwrites any earlier value for `name`. The name is free-form and
    /// need not be declared anywhere.
    pub fn register_parent_flag(&mut self, name: &str, value: FlagValue) -> &mut Self {
        self.parent_flags.insert(name.to_string(), value);
        self
    }

    /// Copies a declared flag of `parent` into this parser's parent flags.
    ///
    /// # Errors
    ///
    /// Returns [`UndeclaredOptionError`] if `parent` does not declare `name`.
    pub fn forward_flag(
        &mut self,
        parent: &CommandParser<'_>,
        name: &str,
    ) -> Result<&mut Self, UndeclaredOptionError> {
        let value = parent.flag(name)?.clone();
        Ok(self.register_parent_flag(name, value))
    }

    /// Value forwarded by a parent under `name`, if any.
    pub fn parent_flag(&self, name: &str) -> Option<&FlagValue> {
        self.parent_flags.get(name)
    }

    /// All forwarded values, sorted by name.
    pub fn parent_flags(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.parent_flags.iter().map(|(k, v)| (k.as_str(), v))
    }
}
