use std::str::FromStr;

use optcommand_config::CommandConfig;
use optcommand_core::{
    CommandDef, CommandExit, CommandParser, DispatchOutcome, FlagValue, OptionSpec, OptionTable,
    ParsedFlags, ValidationError, run_and_exit,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const PROGRAM: &str = "optcommand";

/// Output encoding selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!(
                "unknown format `{other}` (expected text, json or yaml)"
            )),
        }
    }
}

fn help_option() -> OptionSpec {
    OptionSpec::boolean("help", Some('h')).with_help("show this help information")
}

fn cli_def() -> Result<CommandDef, ValidationError> {
    Ok(
        CommandDef::new("usage: optcommand [options] <command> [<args>]")
            .with_description(
                "Commands:\n\
                 \x20  usage        print the usage text declared in a file\n\
                 \x20  parse        parse arguments against a declaration file\n\
                 \x20  help         show help for optcommand or one of its commands",
            )
            .with_options(OptionTable::new(vec![
                help_option(),
                OptionSpec::boolean("version", Some('V')).with_help("show version information"),
                OptionSpec::with_argument("format", Some('F'), "<format>")
                    .with_help("output format: text, json or yaml"),
            ])?)
            .with_extra(
                "See 'optcommand help <command>' for more information on a specific command.",
            )
            .with_command(
                "usage",
                CommandDef::new("usage: optcommand usage [options] <file> [<command>...]")
                    .with_description(
                        "Print the usage text declared in <file>, or that of a nested command",
                    )
                    .with_options(OptionTable::new(vec![help_option()])?),
            )
            .with_command(
                "parse",
                CommandDef::new("usage: optcommand parse [options] <file> [<args>...]")
                    .with_description(
                        "Parse <args> against <file> and report flags, arguments and errors\n\
                         at every subcommand level",
                    )
                    .with_options(OptionTable::new(vec![help_option()])?),
            )
            .with_command(
                "help",
                CommandDef::new("usage: optcommand help [<command>]")
                    .with_description("Show help information"),
            ),
    )
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let def = match cli_def() {
        Ok(def) => def,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    run_and_exit(&def, run);
}

fn run(main: &CommandParser<'_>) -> i32 {
    let flags = main.flags();
    if flags["version"].is_set() {
        println!("{PROGRAM} version {PACKAGE_VERSION}");
        return 0;
    }
    if flags["help"].is_set() {
        println!("{}", main.usage());
        return 0;
    }

    let mut cmd = match main.dispatch() {
        DispatchOutcome::Continue(cmd) => cmd,
        DispatchOutcome::Exit(exit @ CommandExit::NoCommand { .. }) => {
            println!("{exit}");
            return exit.code();
        }
        DispatchOutcome::Exit(exit) => {
            eprintln!("{exit}");
            return exit.code();
        }
    };

    cmd.register_parent_flag("format", flags["format"].clone());
    if let Some(message) = cmd.child_error_message(PROGRAM) {
        eprintln!("{message}");
        return 1;
    }
    if cmd.flag("help").is_ok_and(FlagValue::is_set) {
        println!("{}", cmd.usage());
        return 0;
    }

    let result = match cmd.name() {
        Some("usage") => run_usage(&cmd),
        Some("parse") => run_parse(&cmd),
        Some("help") => run_help(&cmd, main.definition()),
        other => Err(format!(
            "no handler for command {}",
            other.unwrap_or("<none>")
        )),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

trait Report: Serialize {
    fn to_text(&self) -> String;
}

fn output_format(cmd: &CommandParser<'_>) -> Result<OutputFormat, String> {
    match cmd.parent_flag("format").and_then(FlagValue::as_str) {
        Some(raw) => raw.parse(),
        None => Ok(OutputFormat::Text),
    }
}

fn emit<R: Report>(report: &R, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(report)
                .map_err(|err| format!("failed to encode JSON: {err}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(report)
                .map_err(|err| format!("failed to encode YAML: {err}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn load_declaration(file: &str) -> Result<(CommandConfig, CommandDef), String> {
    let config =
        CommandConfig::load(file).map_err(|err| format!("failed to load '{file}': {err}"))?;
    let def = config
        .to_def()
        .map_err(|err| format!("failed to load '{file}': {err}"))?;
    debug!(file, commands = def.commands.len(), "declaration ready");
    Ok((config, def))
}

// ---------------------------------------------------------------------------
// usage command
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct UsageReport {
    command: String,
    usage: String,
}

impl Report for UsageReport {
    fn to_text(&self) -> String {
        self.usage.clone()
    }
}

fn run_usage(cmd: &CommandParser<'_>) -> Result<(), String> {
    let Some((file, path)) = cmd.args().split_first() else {
        return Err(format!("missing <file>\n\n{}", cmd.usage()));
    };
    let (config, def) = load_declaration(file)?;

    let mut target = &def;
    for name in path {
        target = target
            .find_command(name)
            .ok_or_else(|| format!("command {name} does not exist"))?;
    }

    let command = std::iter::once(config.program_name())
        .chain(path.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    let report = UsageReport {
        command,
        usage: target.usage_text(),
    };
    emit(&report, output_format(cmd)?)
}

// ---------------------------------------------------------------------------
// parse command
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LevelReport {
    command: String,
    flags: ParsedFlags,
    args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParseReport {
    levels: Vec<LevelReport>,
    exit_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Report for ParseReport {
    fn to_text(&self) -> String {
        let mut out = String::new();
        for level in &self.levels {
            out.push_str(&level.command);
            out.push('\n');
            for (name, value) in level.flags.iter() {
                let shown = match value {
                    FlagValue::Absent => "(not set)".to_string(),
                    FlagValue::Present => "true".to_string(),
                    FlagValue::Value(v) => format!("{v:?}"),
                };
                out.push_str(&format!("  --{name} = {shown}\n"));
            }
            if level.args.is_empty() {
                out.push_str("  args: (none)\n");
            } else {
                out.push_str(&format!("  args: {}\n", level.args.join(" ")));
            }
            if let Some(error) = &level.error {
                out.push_str(&format!("  error: {error}\n"));
            }
        }
        if let Some(message) = &self.message {
            out.push_str(&format!("{message}\n"));
        }
        out.push_str(&format!("exit: {}", self.exit_code));
        out
    }
}

/// Parses `argv` against `def`, following subcommands as far as they go.
fn walk(def: &CommandDef, program: &str, argv: &[String]) -> ParseReport {
    let mut levels = Vec::new();
    let mut path = vec![program.to_string()];
    let mut current = CommandParser::new(def, argv);

    loop {
        levels.push(LevelReport {
            command: path.join(" "),
            flags: current.flags().clone(),
            args: current.args().to_vec(),
            error: current.error().map(ToString::to_string),
        });

        if current.error().is_some() {
            return ParseReport {
                levels,
                exit_code: 1,
                message: current.child_error_message(program),
            };
        }
        if current.definition().commands.is_empty() {
            return ParseReport {
                levels,
                exit_code: 0,
                message: None,
            };
        }

        let outcome = current.dispatch();
        match outcome {
            DispatchOutcome::Continue(child) => {
                path.extend(child.name().map(String::from));
                current = *child;
            }
            DispatchOutcome::Exit(exit) => {
                let message = match &exit {
                    CommandExit::NoCommand { .. } => "no command given".to_string(),
                    other => other.to_string(),
                };
                return ParseReport {
                    levels,
                    exit_code: exit.code(),
                    message: Some(message),
                };
            }
        }
    }
}

fn run_parse(cmd: &CommandParser<'_>) -> Result<(), String> {
    let Some((file, argv)) = cmd.args().split_first() else {
        return Err(format!("missing <file>\n\n{}", cmd.usage()));
    };
    let format = output_format(cmd)?;
    let (config, def) = load_declaration(file)?;

    let report = walk(&def, config.program_name(), argv);
    emit(&report, format)
}

// ---------------------------------------------------------------------------
// help command
// ---------------------------------------------------------------------------

fn run_help(cmd: &CommandParser<'_>, main_def: &CommandDef) -> Result<(), String> {
    let target = match cmd.args().first() {
        None => main_def,
        Some(name) => main_def
            .find_command(name)
            .ok_or_else(|| format!("command {name} does not exist"))?,
    };
    println!("{}", target.usage_text());
    Ok(())
}
