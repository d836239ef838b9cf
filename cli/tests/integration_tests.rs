use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;

const TOOL_YAML: &str = r#"
name: tool
usage: "usage: tool [-f <filename>] <command> [<args>]"
options:
  - long: file
    short: f
    argument: <filename>
    help: use specified file
commands:
  build:
    usage: "usage: tool build [options]"
    options:
      - long: release
        short: r
        help: build with optimizations
"#;

fn run(args: &[&str]) -> Output {
    std::process::Command::new(env!("CARGO_BIN_EXE_optcommand"))
        .args(args)
        .output()
        .expect("failed to run optcommand")
}

fn write_declaration(dir: &Path) -> PathBuf {
    let path = dir.join("tool.yaml");
    fs::write(&path, TOOL_YAML).expect("failed to write declaration");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// Top-level run loop
// ---------------------------------------------------------------------------

#[test]
fn no_command_prints_usage_and_exits_2() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stdout(&out).starts_with("usage: optcommand [options] <command> [<args>]"));
    assert!(stdout(&out).contains("Options:\n-h, --help"));
}

#[test]
fn unknown_command_exits_1() {
    let out = run(&["frobnicate"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: command frobnicate does not exist"));
}

#[test]
fn unknown_option_exits_1() {
    let out = run(&["--bogus", "help"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: option --bogus not recognized"));
}

#[test]
fn version_flag() {
    let out = run(&["-V"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        stdout(&out).trim(),
        format!("optcommand version {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn help_command_shows_subcommand_usage() {
    let out = run(&["help", "parse"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).starts_with("usage: optcommand parse [options] <file> [<args>...]"));

    let out = run(&["help", "nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("error: command nope does not exist"));
}

#[test]
fn subcommand_option_error_names_the_command() {
    let out = run(&["parse", "--nope"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("optcommand parse: option --nope not recognized"));
}

// ---------------------------------------------------------------------------
// usage command
// ---------------------------------------------------------------------------

#[test]
fn usage_prints_declared_usage() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_declaration(dir.path());

    let out = run(&["usage", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "usage: tool [-f <filename>] <command> [<args>]\n\
         \n\
         Options:\n\
         -f <filename>, --file=<filename>  use specified file\n\
         \n"
    );
}

#[test]
fn usage_of_nested_command_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_declaration(dir.path());

    let out = run(&["--format=json", "usage", path.to_str().unwrap(), "build"]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["command"], "tool build");
    assert!(
        report["usage"]
            .as_str()
            .unwrap()
            .contains("-r, --release  build with optimizations")
    );
}

#[test]
fn usage_of_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let out = run(&["usage", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("failed to load"));
}

// ---------------------------------------------------------------------------
// parse command
// ---------------------------------------------------------------------------

#[test]
fn parse_reports_every_level_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_declaration(dir.path());

    let out = run(&[
        "-F",
        "json",
        "parse",
        path.to_str().unwrap(),
        "-f",
        "a.txt",
        "build",
        "-r",
        "target",
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["exit_code"], 0);
    assert_eq!(report["levels"][0]["command"], "tool");
    assert_eq!(report["levels"][0]["flags"]["file"], "a.txt");
    assert_eq!(report["levels"][1]["command"], "tool build");
    assert_eq!(report["levels"][1]["flags"]["release"], true);
    assert_eq!(report["levels"][1]["args"][0], "target");
}

#[test]
fn parse_reports_short_circuited_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_declaration(dir.path());

    let out = run(&[
        "--format",
        "yaml",
        "parse",
        path.to_str().unwrap(),
        "-f",
        "a.txt",
        "--doesnotexist",
    ]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let report: serde_yaml::Value = serde_yaml::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["exit_code"].as_i64(), Some(1));
    assert!(report["levels"][0]["flags"]["file"].is_null());
    assert_eq!(
        report["levels"][0]["error"].as_str(),
        Some("option --doesnotexist not recognized")
    );
}

#[test]
fn parse_rejects_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_declaration(dir.path());

    let out = run(&["-F", "xml", "parse", path.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("unknown format `xml`"));
}
