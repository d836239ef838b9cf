//! Parsed flag lookup.

use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::{FlagValue, OptionTable};

/// Lookup of a name that was never declared in the option table.
///
/// Distinguishes "flag does not exist" from a declared flag that was
/// simply not supplied (which yields [`FlagValue::Absent`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option '{0}' is not defined")]
pub struct UndeclaredOptionError(pub String);

/// Resolved values for every option declared in a table, keyed by long name.
///
/// Entries keep declaration order. Reading an undeclared name is an error
/// through [`get`](ParsedFlags::get) and a panic through indexing.
///
/// # Examples
///
/// ```
/// use optcommand_core::{FlagValue, OptionSpec, OptionTable, ParsedFlags};
///
/// let table = OptionTable::new(vec![OptionSpec::boolean("help", Some('h'))]).unwrap();
/// let flags = ParsedFlags::declared(&table);
///
/// assert_eq!(flags.get("help"), Ok(&FlagValue::Absent));
/// assert!(flags.get("verbose").is_err());
/// assert_eq!(flags["help"], FlagValue::Absent);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFlags {
    entries: Vec<(String, FlagValue)>,
}

impl ParsedFlags {
    /// Creates one [`Absent`](FlagValue::Absent) entry per declared option.
    pub fn declared(table: &OptionTable) -> Self {
        Self {
            entries: table
                .iter()
                .map(|spec| (spec.long.clone(), FlagValue::Absent))
                .collect(),
        }
    }

    /// Returns the value of a declared option.
    ///
    /// # Errors
    ///
    /// Returns [`UndeclaredOptionError`] if `name` is not declared.
    pub fn get(&self, name: &str) -> Result<&FlagValue, UndeclaredOptionError> {
        self.entries
            .iter()
            .find(|(long, _)| long == name)
            .map(|(_, value)| value)
            .ok_or_else(|| UndeclaredOptionError(name.to_string()))
    }

    /// Returns `true` if the declared option was supplied.
    ///
    /// # Errors
    ///
    /// Returns [`UndeclaredOptionError`] if `name` is not declared.
    pub fn is_set(&self, name: &str) -> Result<bool, UndeclaredOptionError> {
        self.get(name).map(FlagValue::is_set)
    }

    /// Returns the argument supplied for a declared option, if any.
    ///
    /// # Errors
    ///
    /// Returns [`UndeclaredOptionError`] if `name` is not declared.
    pub fn value(&self, name: &str) -> Result<Option<&str>, UndeclaredOptionError> {
        self.get(name).map(FlagValue::as_str)
    }

    /// Returns `true` if `name` is a declared option.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(long, _)| long == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Only declared names are ever assigned.
    pub(crate) fn set(&mut self, name: &str, value: FlagValue) {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(long, _)| long == name) {
            *slot = value;
        }
    }
}

impl Index<&str> for ParsedFlags {
    type Output = FlagValue;

    /// # Panics
    ///
    /// Panics if `name` is not a declared option.
    fn index(&self, name: &str) -> &FlagValue {
        match self.get(name) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Serialize for ParsedFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
