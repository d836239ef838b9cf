//! Declarative command options, getopt parsing and usage text.
//!
//! This crate turns an ordered list of option declarations into a
//! getopt-style parser, a flags lookup and aligned usage text, and
//! dispatches positional arguments to nested subcommands:
//!
//! - [`OptionSpec`]: one option: long name, optional short letter,
//!   optional argument placeholder, help line.
//! - [`OptionTable`]: the validated, ordered declarations of a command.
//! - [`CommandDef`]: a command: usage line, description, options, extra
//!   text and its subcommand registry.
//! - [`CommandParser`]: the parse of one argv slice: [`ParsedFlags`],
//!   positional arguments, usage text and any [`OptionParseError`].
//! - [`DispatchOutcome`]: either the parser of a matched subcommand or a
//!   [`CommandExit`] carrying the exit status.
//!
//! # Example
//!
//! ```
//! use optcommand_core::*;
//!
//! let def = CommandDef::new("usage: mycli [-f <filename>] <command>")
//!     .with_options(
//!         OptionTable::new(vec![
//!             OptionSpec::with_argument("file", Some('f'), "<filename>")
//!                 .with_help("use specified file"),
//!         ])
//!         .unwrap(),
//!     )
//!     .with_command("version", CommandDef::new("usage: mycli version"));
//!
//! let parser = CommandParser::new(&def, &["--file", "a.txt", "version"]);
//! assert!(parser.error().is_none());
//!
//! let DispatchOutcome::Continue(mut child) = parser.dispatch() else {
//!     panic!("expected a subcommand");
//! };
//! child.register_parent_flag("file", parser.flags()["file"].clone());
//! assert_eq!(child.parent_flag("file").and_then(FlagValue::as_str), Some("a.txt"));
//! ```

mod command;
mod dispatch;
mod flags;
mod getopt;
mod table;
mod types;
mod validate;

pub use command::{CommandDef, CommandParser, DEFAULT_USAGE};
pub use dispatch::{CommandExit, DispatchOutcome, run_and_exit, run_main};
pub use flags::{ParsedFlags, UndeclaredOptionError};
pub use getopt::{GetoptMatches, OptionName, OptionParseError, ParsedOption, getopt};
pub use table::OptionTable;
pub use types::*;
pub use validate::{ValidationError, validate_options};
