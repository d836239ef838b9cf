//! Subcommand dispatch and the top-level run loop.
//!
//! Dispatch looks the first positional argument up in the definition's
//! subcommand registry. Anything other than a match ends the run with a
//! [`CommandExit`], which carries the process exit status and the text to
//! print. It is an outcome, not an error: callers can turn it into an exit
//! code without inspecting error kinds.

use std::fmt;

use tracing::debug;

use crate::getopt::OptionParseError;
use crate::{CommandDef, CommandParser};

/// How a run ended without reaching a subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandExit {
    /// No positional arguments were given; the usage text should be shown.
    NoCommand { usage: String },
    /// The first positional argument names no registered subcommand.
    UnknownCommand { name: String },
    /// The parser holds an option error, so dispatch was not attempted.
    ParseFailed { error: OptionParseError },
}

impl CommandExit {
    /// Process exit status for this outcome.
    pub fn code(&self) -> i32 {
        match self {
            CommandExit::NoCommand { .. } => 2,
            CommandExit::UnknownCommand { .. } | CommandExit::ParseFailed { .. } => 1,
        }
    }
}

impl fmt::Display for CommandExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandExit::NoCommand { usage } => f.write_str(usage),
            CommandExit::UnknownCommand { name } => {
                write!(f, "error: command {name} does not exist")
            }
            CommandExit::ParseFailed { error } => write!(f, "error: {error}"),
        }
    }
}

/// Result of [`CommandParser::dispatch`].
#[derive(Debug, Clone)]
pub enum DispatchOutcome<'a> {
    /// A subcommand matched; this is its parser.
    Continue(Box<CommandParser<'a>>),
    /// The run ends here with an exit status.
    Exit(CommandExit),
}

impl DispatchOutcome<'_> {
    /// Exit status if the run ended, `None` on a match.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            DispatchOutcome::Continue(_) => None,
            DispatchOutcome::Exit(exit) => Some(exit.code()),
        }
    }
}

impl<'a> CommandParser<'a> {
    /// Resolves the first positional argument to a registered subcommand.
    ///
    /// On a match the child parser is built from the remaining positional
    /// arguments. Parent flags are not copied; use
    /// [`register_parent_flag`](CommandParser::register_parent_flag) on the
    /// child.
    ///
    /// # Examples
    ///
    /// ```
    /// use optcommand_core::{CommandDef, CommandExit, CommandParser, DispatchOutcome};
    ///
    /// let def = CommandDef::new("usage: tool <command>")
    ///     .with_command("build", CommandDef::new("usage: tool build"));
    ///
    /// let parser = CommandParser::new(&def, &["build", "extra"]);
    /// match parser.dispatch() {
    ///     DispatchOutcome::Continue(child) => {
    ///         assert_eq!(child.name(), Some("build"));
    ///         assert_eq!(child.args(), ["extra"]);
    ///     }
    ///     DispatchOutcome::Exit(exit) => panic!("unexpected exit: {exit}"),
    /// }
    ///
    /// let parser = CommandParser::new(&def, &["frobnicate"]);
    /// assert_eq!(parser.dispatch().exit_code(), Some(1));
    /// ```
    pub fn dispatch(&self) -> DispatchOutcome<'a> {
        if let Some(error) = self.error() {
            return DispatchOutcome::Exit(CommandExit::ParseFailed {
                error: error.clone(),
            });
        }

        let def: &'a CommandDef = self.definition();
        let Some(first) = self.args().first() else {
            debug!("no subcommand given");
            return DispatchOutcome::Exit(CommandExit::NoCommand {
                usage: self.usage().to_string(),
            });
        };

        match def.commands.iter().find(|(name, _)| name == first) {
            Some((name, child)) => {
                debug!(command = %name, args = self.args().len() - 1, "dispatching subcommand");
                DispatchOutcome::Continue(Box::new(CommandParser::build(
                    child,
                    Some(name.as_str()),
                    &self.args()[1..],
                )))
            }
            None => {
                debug!(command = %first, "unknown subcommand");
                DispatchOutcome::Exit(CommandExit::UnknownCommand {
                    name: first.clone(),
                })
            }
        }
    }

    /// Message for a subcommand whose own options failed to parse:
    /// `"<program> <command>: <error>"`.
    ///
    /// Returns `None` when this parser has no error.
    pub fn child_error_message(&self, program: &str) -> Option<String> {
        let error = self.error()?;
        Some(match self.name() {
            Some(name) => format!("{program} {name}: {error}"),
            None => format!("{program}: {error}"),
        })
    }
}

/// Parses `argv` against `def` and hands the parser to `run`.
///
/// A top-level option error is printed to stderr as `error: <message>`
/// and yields exit status `1` without calling `run`.
pub fn run_main<S, F>(def: &CommandDef, argv: &[S], run: F) -> i32
where
    S: AsRef<str>,
    F: FnOnce(&CommandParser<'_>) -> i32,
{
    let parser = CommandParser::new(def, argv);
    if let Some(error) = parser.error() {
        eprintln!("error: {error}");
        return 1;
    }
    run(&parser)
}

/// Runs [`run_main`] over the process arguments and exits with its status.
pub fn run_and_exit<F>(def: &CommandDef, run: F) -> !
where
    F: FnOnce(&CommandParser<'_>) -> i32,
{
    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    std::process::exit(run_main(def, &argv, run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FlagValue, OptionSpec, OptionTable};

    fn main_def() -> CommandDef {
        CommandDef::new("usage: tool [-f <filename>] <command> [<args>]")
            .with_options(
                OptionTable::new(vec![
                    OptionSpec::with_argument("file", Some('f'), "<filename>")
                        .with_help("use specified file"),
                ])
                .unwrap(),
            )
            .with_command(
                "build",
                CommandDef::new("usage: tool build [options]").with_options(
                    OptionTable::new(vec![OptionSpec::boolean("release", Some('r'))]).unwrap(),
                ),
            )
    }

    #[test]
    fn test_dispatch_without_args_exits_with_usage() {
        let def = main_def();
        let parser = CommandParser::new(&def, &[] as &[&str]);
        let DispatchOutcome::Exit(exit) = parser.dispatch() else {
            panic!("expected exit");
        };
        assert_eq!(exit.code(), 2);
        assert_eq!(exit.to_string(), def.usage_text());
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let def = main_def();
        let parser = CommandParser::new(&def, &["frobnicate"]);
        let DispatchOutcome::Exit(exit) = parser.dispatch() else {
            panic!("expected exit");
        };
        assert_eq!(exit.code(), 1);
        assert_eq!(exit.to_string(), "error: command frobnicate does not exist");
    }

    #[test]
    fn test_dispatch_refused_after_parse_error() {
        let def = main_def();
        let parser = CommandParser::new(&def, &["--bogus", "build"]);
        let DispatchOutcome::Exit(exit) = parser.dispatch() else {
            panic!("expected exit");
        };
        assert_eq!(exit.code(), 1);
        assert!(matches!(exit, CommandExit::ParseFailed { .. }));
    }

    #[test]
    fn test_dispatch_builds_child_from_remaining_args() {
        let def = main_def();
        let parser = CommandParser::new(&def, &["-f", "x", "build", "-r", "target"]);
        let DispatchOutcome::Continue(mut child) = parser.dispatch() else {
            panic!("expected subcommand");
        };
        assert_eq!(child.name(), Some("build"));
        assert_eq!(child.flags()["release"], FlagValue::Present);
        assert_eq!(child.args(), ["target"]);

        child.register_parent_flag("file", parser.flags()["file"].clone());
        assert_eq!(child.parent_flag("file"), Some(&FlagValue::Value("x".into())));
    }

    #[test]
    fn test_child_error_message() {
        let def = main_def();
        let parser = CommandParser::new(&def, &["build", "--fast"]);
        let DispatchOutcome::Continue(child) = parser.dispatch() else {
            panic!("expected subcommand");
        };
        assert_eq!(
            child.child_error_message("tool").as_deref(),
            Some("tool build: option --fast not recognized")
        );
        assert_eq!(parser.child_error_message("tool"), None);
    }

    #[test]
    fn test_run_main_skips_run_on_error() {
        let def = main_def();
        let mut called = false;
        let code = run_main(&def, &["--bogus"], |_| {
            called = true;
            0
        });
        assert_eq!(code, 1);
        assert!(!called);

        let code = run_main(&def, &["-f", "x"], |parser| {
            assert_eq!(parser.flags().value("file"), Ok(Some("x")));
            7
        });
        assert_eq!(code, 7);
    }
}
