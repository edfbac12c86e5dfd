mod common;

use assert_cmd::Command;
use common::DbBuilder;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a sxgeo command
fn sxgeo_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sxgeo"))
}

/// Write a small database into `dir` and return its path
fn write_db(dir: &TempDir) -> PathBuf {
    let data = DbBuilder::new()
        .range("5.0.0.0", 185)
        .range("5.8.0.0", 222)
        .range("8.8.0.0", 225)
        .range("188.163.0.0", 222)
        .range("188.164.0.0", 74)
        .bucket_rows(2)
        .build();
    let path = dir.path().join("SxGeo.dat");
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_help() {
    sxgeo_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SxGeo"));
}

#[test]
fn test_version() {
    sxgeo_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sxgeo"));
}

#[test]
fn test_subcommand_help() {
    for (cmd, text) in [
        ("query", "Look up the country"),
        ("inspect", "Show header fields"),
        ("validate", "Validate a database file"),
        ("check", "Compare lookups against a JSON fixture file"),
    ] {
        sxgeo_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(text));
    }
}

#[test]
fn test_query_requires_ip() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);
    sxgeo_cmd().arg("query").arg(&db).assert().failure();
}

#[test]
fn test_query_resolves() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);

    sxgeo_cmd()
        .arg("query")
        .arg(&db)
        .arg("188.163.89.66")
        .arg("8.8.8.8")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"country\": \"UA\""))
        .stdout(predicate::str::contains("\"id\": 222"))
        .stdout(predicate::str::contains("\"country\": \"US\""));
}

#[test]
fn test_query_unresolved_exit_code() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);

    // Before the first range
    sxgeo_cmd()
        .arg("query")
        .arg(&db)
        .arg("1.2.3.4")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown country"));

    sxgeo_cmd()
        .arg("query")
        .arg(&db)
        .arg("not-an-ip")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid address"));

    sxgeo_cmd()
        .arg("query")
        .arg("--quiet")
        .arg(&db)
        .arg("5.8.1.1")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_query_missing_database() {
    sxgeo_cmd()
        .arg("query")
        .arg("/nonexistent/SxGeo.dat")
        .arg("8.8.8.8")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load database"));
}

#[test]
fn test_inspect() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);

    sxgeo_cmd()
        .arg("inspect")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("First-level:     224 entries"))
        .stdout(predicate::str::contains(
            "Ranges:          5 rows of 4 bytes",
        ));

    sxgeo_cmd()
        .arg("inspect")
        .arg(&db)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ranges_count\": 5"))
        .stdout(predicate::str::contains("\"trailing_bytes\": 0"));
}

#[test]
fn test_validate() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);

    sxgeo_cmd()
        .arg("validate")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ VALID"));

    sxgeo_cmd()
        .arg("validate")
        .arg(&db)
        .arg("--level")
        .arg("standard")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"is_valid\": true"));

    sxgeo_cmd()
        .arg("validate")
        .arg(&db)
        .arg("--level")
        .arg("paranoid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid validation level"));
}

#[test]
fn test_validate_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.dat");
    fs::write(&path, b"SxG not a real database").unwrap();

    sxgeo_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ INVALID"));
}

#[test]
fn test_check_fixtures() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir);

    let good = dir.path().join("good.json");
    fs::write(
        &good,
        r#"[{"ip": "188.163.89.66", "country": "UA"}, {"ip": "8.8.8.8", "country": "us"}]"#,
    )
    .unwrap();
    sxgeo_cmd()
        .arg("check")
        .arg(&db)
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("2/2 fixtures passed"));

    let bad = dir.path().join("bad.json");
    fs::write(&bad, r#"[{"ip": "5.8.1.1", "country": "RU"}]"#).unwrap();
    sxgeo_cmd()
        .arg("check")
        .arg(&db)
        .arg(&bad)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ 5.8.1.1: expected RU, got UA"));
}
