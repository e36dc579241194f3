use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FORM_TEXT: &str = "\
1. Name (Block Letters- As specified on Passport or Pan Card): PRIYA SHARMA
3. Current Address: 3.1 Street Address: 12 Oak Rd
3.2 City: Pune 3.3 State: MH
3.4 Zip Code: 411001
3.5 Country: India
6. Gender: Female
7. Mobile: 9876543210
8. Email ID: priya.sharma@example.com
Sr No. 1 Name of the School/ University: Pune University Qualification: B.E. % or CGPA: 8.4 Pass out Year: 2020
";

fn formscan() -> Command {
    Command::cargo_bin("formscan").unwrap()
}

/// Config with the SQLite store and uploads kept inside `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    let config = serde_json::json!({
        "storage": {
            "backend": "sqlite",
            "database_path": dir.join("records.db"),
        },
        "upload": { "upload_dir": dir.join("uploads") },
        "models": { "model_dir": dir.join("models") },
    });
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

fn write_form(dir: &Path) -> PathBuf {
    let path = dir.join("form.txt");
    fs::write(&path, FORM_TEXT).unwrap();
    path
}

#[test]
fn extract_from_text_prints_record() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["extract", "--from-text"])
        .arg(write_form(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""Name": "PRIYA SHARMA""#))
        .stdout(predicate::str::contains(r#""Mobile": "9876543210""#))
        .stdout(predicate::str::contains(r#""Permanent Address""#))
        .stdout(predicate::str::contains(r#""Age": null"#));
}

#[test]
fn extract_report_lists_missing_fields() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["extract", "--from-text", "--report"])
        .arg(write_form(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("missing_fields"))
        .stdout(predicate::str::contains("Date of Birth"));
}

#[test]
fn extract_csv_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["extract", "--from-text", "--format", "csv"])
        .arg(write_form(dir.path()))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Name,Permanent Address,Current Address"))
        .stdout(predicate::str::contains("PRIYA SHARMA"))
        .stdout(predicate::str::contains("B.E. (Pune University, 8.4, 2020)"));
}

#[test]
fn extract_rejects_unsupported_type() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("form.docx");
    fs::write(&input, "whatever").unwrap();

    formscan()
        .arg("-c")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type: form.docx"));
}

#[test]
fn ingest_rejects_unsupported_type() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("form.docx");
    fs::write(&input, "whatever").unwrap();

    formscan()
        .arg("-c")
        .arg(&config)
        .arg("ingest")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error processing file form.docx"))
        .stderr(predicate::str::contains("unsupported file type"));

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["records", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""records": []"#));
}

#[test]
fn ingest_continue_on_error_reports_failures() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let docx = dir.path().join("notes.docx");
    let broken = dir.path().join("broken.png");
    fs::write(&docx, "whatever").unwrap();
    fs::write(&broken, "not an image").unwrap();

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["ingest", "--continue-on-error"])
        .arg(&docx)
        .arg(&broken)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully processed 0 file(s)"))
        .stdout(predicate::str::contains(r#""file": "notes.docx""#))
        .stdout(predicate::str::contains(r#""file": "broken.png""#));
}

#[test]
fn ingest_missing_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .arg("ingest")
        .arg(dir.path().join("absent.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn records_get_unknown_id() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    for id in ["not-a-uuid", "0192f5a4-7c1e-7d2a-9b3c-4d5e6f708192"] {
        formscan()
            .arg("-c")
            .arg(&config)
            .args(["records", "get", id])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Record not found"));
    }
}

#[test]
fn records_search_empty_store() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["records", "search", "--name", "john", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records found."));
}

#[test]
fn rules_lists_every_field() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("Name [leaf]"))
        .stdout(predicate::str::contains("Current Address [group]"))
        .stdout(predicate::str::contains("Current Address.Zip Code:"))
        .stdout(predicate::str::contains("Educational Qualification [repeat]"));
}

#[test]
fn rules_check_reports_bad_pattern() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(
        &config,
        r#"{"extraction": {"patterns": {"age": "Age:\\s*\\d+"}}}"#,
    )
    .unwrap();

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["rules", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("exactly one capture group"));
}

#[test]
fn rules_check_default_patterns() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["rules", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("patterns compiled"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.json");

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(config.exists());

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "storage.backend", "memory"])
        .assert()
        .success();

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "storage.backend"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""memory""#));

    formscan()
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.patterns.age", "no groups"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one capture group"));
}
