use std::fs;

use optcommand_config::{CommandConfig, ConfigError, load_command};
use optcommand_core::{CommandParser, DispatchOutcome, FlagValue, OptionSpec};

const TOOL_YAML: &str = r#"
name: tool
usage: "usage: tool [-f <filename>] <command> [<args>]"
description: "Commands:\n   build        build the project"
options:
  - long: file
    short: f
    argument: <filename>
    help: use specified file
  - long: help
    short: h
    help: show this help information
extra: "See 'tool help <command>' for more information."
commands:
  build:
    usage: "usage: tool build [options]"
    options:
      - long: release
        short: r
        help: build with optimizations
"#;

#[test]
fn test_load_yaml_file_and_parse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tool.yaml");
    fs::write(&path, TOOL_YAML).unwrap();

    let def = load_command(&path).unwrap();
    let parser = CommandParser::new(&def, &["-f", "a.txt", "build", "-r"]);
    assert!(parser.error().is_none());
    assert_eq!(parser.flags()["file"], FlagValue::Value("a.txt".into()));

    let DispatchOutcome::Continue(child) = parser.dispatch() else {
        panic!("expected build subcommand");
    };
    assert_eq!(child.flags()["release"], FlagValue::Present);
}

#[test]
fn test_loaded_usage_text_is_aligned() {
    let def = CommandConfig::from_yaml_str(TOOL_YAML).unwrap().to_def().unwrap();
    let expected = "\
usage: tool [-f <filename>] <command> [<args>]

Commands:
   build        build the project

Options:
-f <filename>, --file=<filename>  use specified file
-h, --help                        show this help information

See 'tool help <command>' for more information.";
    assert_eq!(def.usage_text(), expected);
}

#[test]
fn test_yaml_and_json_declarations_agree() {
    let dir = tempfile::tempdir().unwrap();
    let yaml_path = dir.path().join("tool.yml");
    let json_path = dir.path().join("tool.json");
    fs::write(&yaml_path, TOOL_YAML).unwrap();

    let config = CommandConfig::load(&yaml_path).unwrap();
    config.save(&json_path).unwrap();

    let from_yaml = load_command(&yaml_path).unwrap();
    let from_json = load_command(&json_path).unwrap();
    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_save_and_load_built_in_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated.yaml");

    let mut config = CommandConfig {
        name: Some("gen".into()),
        usage: "usage: gen [options]".into(),
        ..Default::default()
    };
    config.options.push(
        OptionSpec::with_argument("output", Some('o'), "<path>").with_help("write to <path>"),
    );
    config.save(&path).unwrap();

    let loaded = CommandConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tool.toml");
    fs::write(&path, "usage = 'x'").unwrap();

    let err = load_command(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_command(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}

#[test]
fn test_invalid_table_in_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"name": "bad", "options": [{"long": "help"}, {"long": "help"}]}"#,
    )
    .unwrap();

    let err = load_command(&path).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid options for `bad`: duplicate long option: --help"
    );
}
