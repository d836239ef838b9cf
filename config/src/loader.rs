//! Reading and writing declaration files.
//!
//! The format is chosen from the file extension: `.yaml`/`.yml` for YAML,
//! `.json` for JSON.
//!
//! ```no_run
//! use optcommand_config::load_command;
//!
//! let def = load_command("tool.yaml").unwrap();
//! println!("{}", def.usage_text());
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use optcommand_core::CommandDef;
use tracing::debug;

use crate::config::CommandConfig;
use crate::error::{ConfigError, Result};

/// Encoding of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Yaml,
    Json,
}

impl DeclarationFormat {
    /// Detects the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for any other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use optcommand_config::DeclarationFormat;
    ///
    /// assert_eq!(DeclarationFormat::from_path("tool.yml").unwrap(), DeclarationFormat::Yaml);
    /// assert_eq!(DeclarationFormat::from_path("tool.JSON").unwrap(), DeclarationFormat::Json);
    /// assert!(DeclarationFormat::from_path("tool.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl CommandConfig {
    /// Parses a YAML declaration.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError`](ConfigError::YamlError) if decoding fails.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a JSON declaration.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](ConfigError::JsonError) if decoding fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a declaration file, picking the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](ConfigError::IoError) if the file cannot
    /// be read, or a decoding error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DeclarationFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let config: Self = match format {
            DeclarationFormat::Yaml => serde_yaml::from_reader(reader)?,
            DeclarationFormat::Json => serde_json::from_reader(reader)?,
        };
        debug!(path = %path.display(), ?format, "loaded command declaration");
        Ok(config)
    }

    /// Writes the declaration, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat),
    /// [`IoError`](ConfigError::IoError), or an encoding error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = DeclarationFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            DeclarationFormat::Yaml => serde_yaml::to_writer(writer, self)?,
            DeclarationFormat::Json => serde_json::to_writer_pretty(writer, self)?,
        }
        Ok(())
    }
}

/// Loads a declaration file and builds its validated [`CommandDef`].
///
/// # Errors
///
/// Any error of [`CommandConfig::load`] or [`CommandConfig::to_def`].
pub fn load_command(path: impl AsRef<Path>) -> Result<CommandDef> {
    CommandConfig::load(path)?.to_def()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_str_with_nested_commands() {
        let yaml = r#"
name: tool
usage: "usage: tool [options] <command>"
options:
  - long: file
    short: f
    argument: <filename>
    help: use specified file
  - long: debug
    short: ""
commands:
  build:
    usage: "usage: tool build"
"#;
        let config = CommandConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.program_name(), "tool");
        assert_eq!(config.options.len(), 2);
        assert_eq!(config.options[0].short, Some('f'));
        assert_eq!(config.options[1].short, None);
        assert_eq!(config.commands[0].0, "build");
    }

    #[test]
    fn test_from_json_str_error() {
        let err = CommandConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::JsonError(_)));
    }

    #[test]
    fn test_from_yaml_str_rejects_multi_letter_short() {
        let err = CommandConfig::from_yaml_str("options:\n  - long: file\n    short: fi\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }
}
