mod common;

use common::TestResult;
use std::fs;
use std::process::Command;

const JOB: &str = r#"{
    "kind": "QT",
    "customer": {"name": "ACME", "address": "1 Main Rd"},
    "tax_enabled": true,
    "items": [{"description": "Survey", "quantity": "2", "unit_price": 1500}]
}"#;

fn quotegrid() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quotegrid"));
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_cli_issues_and_records() -> TestResult {
    let dir = tempfile::tempdir()?;
    let job = dir.path().join("job.json");
    let config = dir.path().join("quotegrid.json");
    let out = dir.path().join("out.pdf");
    fs::write(&job, JOB)?;
    fs::write(&config, r#"{"history_file": "history.csv"}"#)?;

    let output = quotegrid()
        .arg("--config")
        .arg(&config)
        .args(["--date", "2024-02-29"])
        .arg(&job)
        .arg(&out)
        .output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("QT-20240229-001"), "{}", stdout);
    assert!(stdout.contains("grand total 3210"), "{}", stdout);
    assert_eq!(lopdf::Document::load(&out)?.get_pages().len(), 1);

    let history = fs::read_to_string(dir.path().join("history.csv"))?;
    assert!(history.contains("QT-20240229-001"));

    let again = quotegrid()
        .arg("--config")
        .arg(&config)
        .args(["--date", "2024-02-29"])
        .arg(&job)
        .arg(&out)
        .output()?;
    assert!(String::from_utf8_lossy(&again.stdout).contains("QT-20240229-002"));
    Ok(())
}

#[test]
fn test_cli_no_record_leaves_history_alone() -> TestResult {
    let dir = tempfile::tempdir()?;
    let job = dir.path().join("job.json");
    let config = dir.path().join("quotegrid.json");
    fs::write(&job, JOB)?;
    fs::write(&config, r#"{"history_file": "history.csv"}"#)?;

    let output = quotegrid()
        .arg("--config")
        .arg(&config)
        .arg("--no-record")
        .arg(&job)
        .arg(dir.path().join("preview.pdf"))
        .output()?;
    assert!(output.status.success());
    assert!(!dir.path().join("history.csv").exists());
    Ok(())
}

#[test]
fn test_cli_rejects_bad_job() -> TestResult {
    let dir = tempfile::tempdir()?;
    let job = dir.path().join("job.json");
    fs::write(&job, "{ not json")?;

    let output = quotegrid().arg(&job).arg(dir.path().join("out.pdf")).output()?;
    assert!(!output.status.success());
    assert!(!dir.path().join("out.pdf").exists());
    Ok(())
}
