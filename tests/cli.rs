//! End-to-end CLI tests
//!
//! Default-run scenarios spawn the external loader and are exercised by the
//! unit tests on the invocation builder instead, so these tests stay
//! runnable without a JavaScript toolchain installed.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jiti-tsc").unwrap();
    cmd.current_dir(dir)
        .env_remove("JITI_TSCONFIG_PATH")
        .env_remove("JITI_VERBOSE");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn project_with_aliases(temp: &TempDir) {
    write_file(
        temp.path(),
        "tsconfig.json",
        r#"{
            "compilerOptions": {
                "baseUrl": ".",
                "paths": { "@app/*": ["src/*"] },
                "esModuleInterop": true
            }
        }"#,
    );
    write_file(temp.path(), "src/index.ts", "export {};");
}

#[test]
fn help_command_prints_usage_and_exits_zero() {
    let temp = TempDir::new().unwrap();

    for invocation in [vec!["help"], vec!["--help"], vec!["-h"], vec![]] {
        cli(temp.path())
            .args(&invocation)
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage: jiti-tsc"))
            .stdout(predicate::str::contains("print-config"));
    }
}

#[test]
fn print_config_emits_resolved_options() {
    let temp = TempDir::new().unwrap();
    project_with_aliases(&temp);

    cli(temp.path())
        .arg("print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tsconfigPath\""))
        .stdout(predicate::str::contains("\"@app\""))
        .stdout(predicate::str::contains("\"interopDefault\":true"));
}

#[test]
fn print_config_without_any_tsconfig_is_lenient() {
    let temp = TempDir::new().unwrap();

    cli(temp.path())
        .arg("print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("{}"))
        .stdout(predicate::str::contains("tsconfigPath").not())
        .stdout(predicate::str::contains("alias").not());
}

#[test]
fn print_config_with_explicit_missing_path_fails() {
    let temp = TempDir::new().unwrap();

    cli(temp.path())
        .args(["print-config", "--tsconfig=./does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn print_config_with_explicit_env_path_missing_fails() {
    let temp = TempDir::new().unwrap();

    cli(temp.path())
        .arg("print-config")
        .env("JITI_TSCONFIG_PATH", "./nope/tsconfig.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn print_config_surfaces_parse_error_for_explicit_path() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "broken.json", "{ not json ");

    cli(temp.path())
        .args(["print-config", "--tsconfig=./broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn print_config_rejects_path_overloads() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "tsconfig.json",
        r#"{
            "compilerOptions": {
                "paths": { "@/*": ["./a/*", "./b/*"] }
            }
        }"#,
    );
    write_file(temp.path(), "index.ts", "");

    cli(temp.path())
        .args(["print-config", "--tsconfig=./tsconfig.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("@/*"))
        .stderr(predicate::str::contains("2"))
        .stderr(predicate::str::contains("./a/*"))
        .stderr(predicate::str::contains("./b/*"));
}

#[test]
fn print_config_writes_output_file_creating_parents() {
    let temp = TempDir::new().unwrap();
    project_with_aliases(&temp);

    cli(temp.path())
        .args(["print-config", "--output=./out/nested/loader-config.json"])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join("out/nested/loader-config.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();

    assert!(json["tsconfigPath"].as_str().unwrap().contains("tsconfig.json"));
    assert!(json["alias"]["@app"].as_str().unwrap().ends_with("/src"));
    assert_eq!(json["interopDefault"], true);
}

#[test]
fn print_config_resolves_extends_chain() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "tsconfig.base.json",
        r#"{ "compilerOptions": { "sourceMap": true } }"#,
    );
    write_file(
        temp.path(),
        "tsconfig.json",
        r#"{
            "extends": "./tsconfig.base.json",
            "compilerOptions": {
                "baseUrl": ".",
                "paths": { "@lib/*": ["lib/*"] }
            }
        }"#,
    );
    write_file(temp.path(), "lib/mod.ts", "");

    cli(temp.path())
        .arg("print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sourceMaps\":true"))
        .stdout(predicate::str::contains("\"@lib\""));
}

#[test]
fn print_config_fails_when_no_files_match_explicit_config() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "tsconfig.json",
        r#"{ "include": ["no-such-dir"] }"#,
    );

    cli(temp.path())
        .args(["print-config", "--tsconfig=./tsconfig.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("include"));
}
