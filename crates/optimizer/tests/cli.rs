// ABOUTME: Integration tests for the amp-optimizer CLI binary.
// ABOUTME: Tests file and stdin input, JSON reports, config files and error exits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const PAGE: &str = r#"<!doctype html>
<html ⚡>
<head>
<style amp-boilerplate>body{visibility:hidden}</style>
<noscript><style amp-boilerplate>body{visibility:visible}</style></noscript>
</head>
<body><amp-img layout="fixed" width="10" height="10" src="a.png"></amp-img></body>
</html>"#;

fn optimizer_cmd() -> Command {
    Command::cargo_bin("amp-optimizer").unwrap()
}

#[test]
fn optimizes_file_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, PAGE).unwrap();

    optimizer_cmd()
        .arg(&html_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("i-amphtml-no-boilerplate"))
        .stdout(predicate::str::contains("<style amp-runtime=\"\"></style>"))
        .stdout(predicate::str::contains("noscript").not());
}

#[test]
fn reads_stdin_and_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("out.html");

    optimizer_cmd()
        .arg("-o")
        .arg(&out_path)
        .write_stdin(PAGE)
        .assert()
        .success();

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("width:10px;height:10px;"));
}

#[test]
fn json_report() {
    let output = optimizer_cmd()
        .arg("--json")
        .write_stdin(PAGE)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["layout_applied"], true);
    assert_eq!(report["boilerplate_removed"], true);
    assert!(report["html"].as_str().unwrap().contains("i-amphtml-layout"));
}

#[test]
fn no_ssr_leaves_boilerplate() {
    optimizer_cmd()
        .arg("--no-ssr")
        .write_stdin(PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains("<noscript>"))
        .stdout(predicate::str::contains("i-amphtml-layout").not());
}

#[test]
fn config_file_adds_render_delaying_extension() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("options.json");
    fs::write(
        &config_path,
        r#"{"render_delaying_extensions": ["amp-bind"]}"#,
    )
    .unwrap();
    let page = PAGE.replace(
        "</head>",
        r#"<script async custom-element="amp-bind" src="b.js"></script></head>"#,
    );

    optimizer_cmd()
        .arg("--config")
        .arg(&config_path)
        .write_stdin(page)
        .assert()
        .success()
        .stdout(predicate::str::contains("i-amphtml-no-boilerplate").not())
        .stdout(predicate::str::contains("<noscript>"));
}

#[test]
fn invalid_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("options.json");
    fs::write(&config_path, "{broken").unwrap();

    optimizer_cmd()
        .arg("--config")
        .arg(&config_path)
        .write_stdin(PAGE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn missing_input_fails() {
    optimizer_cmd()
        .arg("/definitely/not/here.html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read input"));
}
