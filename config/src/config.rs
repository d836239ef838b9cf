//! Serializable command declarations.
//!
//! Mirrors [`CommandDef`] in a form that can be written by hand in YAML or
//! JSON. Subcommands keep the order they are written in.
//!
//! # Example YAML
//!
//! ```yaml
//! name: tool
//! usage: "usage: tool [-f <filename>] <command> [<args>]"
//! description: "Commands:\n  build  build the project"
//! options:
//!   - long: file
//!     short: f
//!     argument: <filename>
//!     help: use specified file
//!   - long: debug
//!     short: ""
//!     help: show debug information
//! extra: "See 'tool help <command>' for more information."
//! commands:
//!   build:
//!     usage: "usage: tool build [options]"
//!     options:
//!       - long: release
//!         short: r
//!         help: build with optimizations
//! ```

use std::fmt;

use optcommand_core::{CommandDef, DEFAULT_USAGE, OptionSpec, OptionTable};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ConfigError, Result};

/// Program name used in error paths when a declaration has no `name`.
pub const DEFAULT_PROGRAM_NAME: &str = "command";

/// Hand-written declaration of a command and its subcommands.
///
/// # Examples
///
/// ```
/// use optcommand_config::CommandConfig;
///
/// let config = CommandConfig::from_yaml_str(
///     "usage: 'usage: tool [options]'\noptions:\n  - long: help\n    short: h\n",
/// )
/// .unwrap();
/// let def = config.to_def().unwrap();
/// assert_eq!(def.options.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Program name (top level only), used in error messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Usage synopsis line
    #[serde(default = "default_usage")]
    pub usage: String,
    /// Short description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Options in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
    /// Extra usage text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra: String,
    /// Subcommands in declaration order
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "serialize_commands",
        deserialize_with = "deserialize_commands"
    )]
    pub commands: Vec<(String, CommandConfig)>,
}

fn default_usage() -> String {
    DEFAULT_USAGE.to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: None,
            usage: default_usage(),
            description: String::new(),
            options: Vec::new(),
            extra: String::new(),
            commands: Vec::new(),
        }
    }
}

impl CommandConfig {
    /// Program name, falling back to [`DEFAULT_PROGRAM_NAME`].
    pub fn program_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_PROGRAM_NAME)
    }

    /// Validates every option table and builds the [`CommandDef`] tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOptions`] naming the command path of the
    /// first table that fails validation.
    pub fn to_def(&self) -> Result<CommandDef> {
        let mut path = vec![self.program_name().to_string()];
        build_def(self, &mut path)
    }
}

fn build_def(config: &CommandConfig, path: &mut Vec<String>) -> Result<CommandDef> {
    let options =
        OptionTable::new(config.options.clone()).map_err(|source| ConfigError::InvalidOptions {
            command: path.join(" "),
            source,
        })?;

    let mut def = CommandDef::new(&config.usage)
        .with_description(&config.description)
        .with_options(options)
        .with_extra(&config.extra);

    for (name, child) in &config.commands {
        path.push(name.clone());
        let child_def = build_def(child, path);
        path.pop();
        def = def.with_command(name, child_def?);
    }

    Ok(def)
}

fn serialize_commands<S: Serializer>(
    commands: &[(String, CommandConfig)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(commands.len()))?;
    for (name, config) in commands {
        map.serialize_entry(name, config)?;
    }
    map.end()
}

fn deserialize_commands<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<(String, CommandConfig)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedCommands;

    impl<'de> Visitor<'de> for OrderedCommands {
        type Value = Vec<(String, CommandConfig)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of subcommand names to declarations")
        }

        fn visit_map<A: MapAccess<'de>>(
            self,
            mut access: A,
        ) -> std::result::Result<Self::Value, A::Error> {
            let mut commands: Vec<(String, CommandConfig)> = Vec::new();
            while let Some((name, config)) = access.next_entry::<String, CommandConfig>()? {
                if commands.iter().any(|(n, _)| *n == name) {
                    return Err(serde::de::Error::custom(format!(
                        "duplicate subcommand: {name}"
                    )));
                }
                commands.push((name, config));
            }
            Ok(commands)
        }
    }

    deserializer.deserialize_map(OrderedCommands)
}

#[cfg(test)]
mod tests {
    use optcommand_core::ValidationError;

    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: CommandConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CommandConfig::default());
        assert_eq!(config.usage, DEFAULT_USAGE);
        assert_eq!(config.program_name(), DEFAULT_PROGRAM_NAME);
    }

    #[test]
    fn test_commands_keep_written_order() {
        let config: CommandConfig =
            serde_json::from_str(r#"{"commands": {"zeta": {}, "alpha": {}, "mid": {}}}"#).unwrap();
        let names: Vec<&str> = config.commands.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let def = config.to_def().unwrap();
        assert_eq!(def.command_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<CommandConfig, _> =
            serde_json::from_str(r#"{"usage": "x", "optionz": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_nested_table_reports_path() {
        let config: CommandConfig = serde_json::from_str(
            r#"{
                "name": "tool",
                "commands": {
                    "build": {
                        "options": [
                            {"long": "release", "short": "r"},
                            {"long": "run", "short": "r"}
                        ]
                    }
                }
            }"#,
        )
        .unwrap();

        let err = config.to_def().unwrap_err();
        match &err {
            ConfigError::InvalidOptions { command, source } => {
                assert_eq!(command, "tool build");
                assert_eq!(*source, ValidationError::DuplicateShort('r'));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            "invalid options for `tool build`: duplicate short option: -r"
        );
    }

    #[test]
    fn test_serialize_round_trips_commands() {
        let mut config = CommandConfig::default();
        config
            .commands
            .push(("build".into(), CommandConfig::default()));
        let json = serde_json::to_string(&config).unwrap();
        let back: CommandConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
