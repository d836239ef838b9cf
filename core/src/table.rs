//! Ordered option tables.
//!
//! An [`OptionTable`] is the validated, ordered form of a command's option
//! declarations. From it the getopt specifications and the aligned
//! `Options:` section of the usage text are derived.

use serde::Serialize;

use crate::validate::{ValidationError, validate_options};
use crate::OptionSpec;

/// Validated, ordered collection of [`OptionSpec`]s.
///
/// Declaration order is preserved and decides both the order of usage
/// lines and which declaration wins when matching parsed options.
///
/// # Examples
///
/// ```
/// use optcommand_core::{OptionSpec, OptionTable};
///
/// let table = OptionTable::new(vec![
///     OptionSpec::boolean("help", Some('h')).with_help("show this help information"),
///     OptionSpec::with_argument("file", Some('f'), "<filename>").with_help("use specified file"),
///     OptionSpec::boolean("version", None).with_help("show version information"),
/// ])
/// .unwrap();
///
/// assert_eq!(table.short_spec(), "hf:");
/// assert_eq!(table.long_spec(), vec!["help", "file=", "version"]);
/// assert_eq!(table.column_width(), 32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
}

impl OptionTable {
    /// Builds a table, rejecting declarations that fail validation.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found by
    /// [`validate_options`].
    pub fn new(specs: Vec<OptionSpec>) -> Result<Self, ValidationError> {
        if let Some(err) = validate_options(&specs).into_iter().next() {
            return Err(err);
        }
        Ok(Self { specs })
    }

    /// Returns a table with no options.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.specs.iter()
    }

    /// Finds a declaration by exact long name.
    pub fn find_long(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.long == name)
    }

    /// Finds the first declaration using the given short letter.
    pub fn find_short(&self, letter: char) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.short == Some(letter))
    }

    /// Builds the getopt short option string, e.g. `"hf:"`.
    pub fn short_spec(&self) -> String {
        let mut spec = String::new();
        for option in self.specs.iter() {
            if let Some(short) = option.short {
                spec.push(short);
                if option.takes_argument() {
                    spec.push(':');
                }
            }
        }
        spec
    }

    /// Builds the getopt long option list, e.g. `["help", "file="]`.
    pub fn long_spec(&self) -> Vec<String> {
        self.specs
            .iter()
            .map(|option| {
                if option.takes_argument() {
                    format!("{}=", option.long)
                } else {
                    option.long.clone()
                }
            })
            .collect()
    }

    /// Widest option column across the table, in characters.
    pub fn column_width(&self) -> usize {
        self.specs
            .iter()
            .map(OptionSpec::column_width)
            .max()
            .unwrap_or(0)
    }

    /// Renders the aligned option lines, one per declaration.
    ///
    /// Each line is the option column padded to
    /// [`column_width`](OptionTable::column_width), two spaces, the help
    /// line and a newline.
    pub fn usage_table(&self) -> String {
        let width = self.column_width();
        self.specs
            .iter()
            .map(|option| format!("{:<width$}  {}\n", option.option_column(), option.help))
            .collect()
    }
}

impl TryFrom<Vec<OptionSpec>> for OptionTable {
    type Error = ValidationError;

    fn try_from(specs: Vec<OptionSpec>) -> Result<Self, Self::Error> {
        Self::new(specs)
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
