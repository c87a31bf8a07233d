//! Integration tests for pizzacutter-cli.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const CONF: &str = r#"
[patterns]
"{{PizzaCutter.project_dir}}" = "demo"
"{{PizzaCutter.name}}" = "widget"
"#;

/// Template at `<temp>/template` with a conf file and one project file.
fn template(conf: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let tpl = temp.path().join("template");
    let project = tpl.join("{{PizzaCutter.project_dir}}");
    fs::create_dir_all(&project).unwrap();
    fs::write(tpl.join("pizzacutter.toml"), conf).unwrap();
    fs::write(project.join("README.md"), "# {{PizzaCutter.name}}\n").unwrap();
    temp
}

/// Command isolated from the user's own preferences.
fn pizzacutter(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pizzacutter");
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("PIZZACUTTER_BUILD__ALLOW_OVERWRITE");
    cmd
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

// ── help / version ────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let temp = TempDir::new().unwrap();
    pizzacutter(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rebuild"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    let temp = TempDir::new().unwrap();
    pizzacutter(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_is_usage_error() {
    let temp = TempDir::new().unwrap();
    pizzacutter(&temp)
        .args(["rebuild", "conf.toml", "--bogus"])
        .assert()
        .code(2);
}

// ── rebuild ───────────────────────────────────────────────────────────────

#[test]
fn rebuild_creates_project() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created:     1 files, 1 directories"));

    assert_eq!(read(temp.path().join("out/demo/README.md")), "# widget\n");
    assert!(!temp.path().join("out/pizzacutter.toml").exists());
}

#[test]
fn build_alias_works() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["build", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .success();
    assert!(temp.path().join("out/demo/README.md").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn existing_file_needs_overwrite() {
    let temp = template(CONF);
    let readme = temp.path().join("out/demo/README.md");
    fs::create_dir_all(readme.parent().unwrap()).unwrap();
    fs::write(&readme, "mine\n").unwrap();

    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .success();
    assert_eq!(read(&readme), "mine\n");

    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out", "--overwrite"])
        .assert()
        .success();
    assert_eq!(read(&readme), "# widget\n");
}

#[test]
fn environment_preference_enables_overwrite() {
    let temp = template(CONF);
    let readme = temp.path().join("out/demo/README.md");
    fs::create_dir_all(readme.parent().unwrap()).unwrap();
    fs::write(&readme, "mine\n").unwrap();

    pizzacutter(&temp)
        .env("PIZZACUTTER_BUILD__ALLOW_OVERWRITE", "true")
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .success();
    assert_eq!(read(&readme), "# widget\n");
}

#[test]
fn json_output_is_the_build_report() {
    let temp = template(CONF);
    let output = pizzacutter(&temp)
        .args([
            "rebuild",
            "template/pizzacutter.toml",
            "-p",
            "out",
            "--output-format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["files_created"], 1);
    assert_eq!(report["dry_run"], false);
    assert!(report["audit"].as_array().unwrap().is_empty());
}

#[test]
fn unfilled_patterns_warn_but_succeed() {
    let temp = template(CONF);
    fs::write(
        temp.path()
            .join("template/{{PizzaCutter.project_dir}}/extra.txt"),
        "{{PizzaCutter.forgotten}}\n",
    )
    .unwrap();

    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "unfilled pattern \"{{PizzaCutter.forgotten}}\"",
        ));
}

// ── errors ────────────────────────────────────────────────────────────────

#[test]
fn missing_conf_file_is_not_found() {
    let temp = TempDir::new().unwrap();
    pizzacutter(&temp)
        .args(["rebuild", "nope.toml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn directory_as_conf_file_is_user_error() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["rebuild", "template"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn pattern_cycle_is_user_error() {
    let temp = template(
        r#"
[patterns]
"{{PizzaCutter.project_dir}}" = "demo"
"{{PizzaCutter.a}}" = "{{PizzaCutter.b}}"
"{{PizzaCutter.b}}" = "{{PizzaCutter.a}}"
"#,
    );
    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml", "-p", "out"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("refers back to"));
    assert!(!temp.path().join("out").exists());
}

#[test]
fn invalid_conf_file_is_configuration_error() {
    let temp = template("[patterns\n");
    pizzacutter(&temp)
        .args(["rebuild", "template/pizzacutter.toml"])
        .assert()
        .code(4);
}

#[test]
fn missing_preferences_file_is_configuration_error() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["-c", "missing.toml", "info", "template/pizzacutter.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

// ── info / completions ────────────────────────────────────────────────────

#[test]
fn info_shows_resolved_patterns() {
    let temp = template(CONF);
    pizzacutter(&temp)
        .args(["info", "template/pizzacutter.toml", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "{{PizzaCutter.name}} = widget (text)",
        ));
}

#[test]
fn info_json_is_parseable() {
    let temp = template(CONF);
    let output = pizzacutter(&temp)
        .args(["info", "template/pizzacutter.toml", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens: Vec<_> = info["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["token"].as_str().unwrap().to_string())
        .collect();
    assert!(tokens.contains(&"{{PizzaCutter.project_dir}}".to_string()));
}

#[test]
fn completions_for_bash() {
    let temp = TempDir::new().unwrap();
    pizzacutter(&temp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pizzacutter"));
}
