//! Command declarations loaded from YAML and JSON files.
//!
//! A declaration file describes a command tree the same way
//! [`CommandDef`](optcommand_core::CommandDef) does in code: usage line,
//! description, options, extra text and nested subcommands.
//!
//! # Quick start
//!
//! ```no_run
//! use optcommand_config::load_command;
//! use optcommand_core::CommandParser;
//!
//! let def = load_command("tool.yaml").unwrap();
//! let parser = CommandParser::new(&def, &["--help"]);
//! if let Some(err) = parser.error() {
//!     eprintln!("error: {err}");
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{CommandConfig, DEFAULT_PROGRAM_NAME};
pub use error::{ConfigError, Result};
pub use loader::{DeclarationFormat, load_command};
