//! Command-line behavior of the `poex` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const FORMAT2_SAMPLE: &str = "\
Purchase Order No: PO-2024-001
Bill To: Acme Corp
Item  Qty  Price  Amount
Widget A  10  2.50  25.00
Total: 25.00
";

const FORMAT3_SAMPLE: &str = "\
/// ORDER CONFIRMATION ///
CUSTOMER: NIPPON STEEL TRADING
ORDER NO: OC-5531
GRADE: SS400
QUANTITY: 20 MT
UNIT PRICE: 650.00
";

fn poex() -> Command {
    Command::cargo_bin("poex").unwrap()
}

#[test]
fn extract_json_from_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("order.txt");
    fs::write(&input, FORMAT2_SAMPLE).unwrap();

    let output = poex().arg("extract").arg(&input).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["po_number"], "PO-2024-001");
    assert_eq!(value["customer_name"], "Acme Corp");
    assert_eq!(value["total_amount"], "25.00");
    assert_eq!(value["products"][0]["product_name"], "Widget A");
}

#[test]
fn extract_from_stdin_as_text() {
    poex()
        .args(["extract", "-", "--format", "text"])
        .write_stdin(FORMAT3_SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Purchase Order: OC-5531"))
        .stdout(predicate::str::contains("Grade SS400  20 x 650.00 = 13000.00"));
}

#[test]
fn extract_csv_to_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("order.txt");
    let output = dir.path().join("order.csv");
    fs::write(&input, FORMAT2_SAMPLE).unwrap();

    poex()
        .arg("extract")
        .arg(&input)
        .args(["-f", "csv", "-o"])
        .arg(&output)
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("po_number,customer_name,"));
    assert!(csv.contains("Widget A,10,2.50,25.00"));
}

#[test]
fn extract_garbage_still_succeeds() {
    poex()
        .args(["extract", "-", "--show-confidence"])
        .write_stdin("%%% ### ???")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"customer_name\": \"Unknown Customer\""))
        .stderr(predicate::str::contains("manual review recommended"));
}

#[test]
fn extract_missing_file_fails() {
    poex()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn classify_reports_breakdown() {
    poex()
        .args(["classify", "-"])
        .write_stdin(FORMAT3_SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Format: format3"))
        .stdout(predicate::str::contains("format3  6/6"));
}

#[test]
fn validate_accepts_legacy_keys() {
    let draft = r#"{"customer": "Acme", "poNumber": "A-1",
        "products": [{"product_name": "Bolt", "quantity": "4", "unitPrice": "0,25"}]}"#;

    let output = poex()
        .args(["validate", "-", "--report"])
        .write_stdin(draft)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["customer_name"], "Acme");
    assert_eq!(value["result"]["products"][0]["name"], "Bolt");
    assert_eq!(value["result"]["products"][0]["subtotal"], "1.00");
    assert_eq!(value["result"]["total_amount"], "1.00");
    assert!(value["quality"]["suggestions"].is_array());
}

#[test]
fn validate_rejects_malformed_json() {
    poex()
        .args(["validate", "-"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid draft record"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    fs::write(dir.path().join("a.txt"), FORMAT2_SAMPLE).unwrap();
    fs::write(dir.path().join("b.txt"), FORMAT3_SAMPLE).unwrap();

    let pattern = dir.path().join("*.txt");
    poex()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("-o")
        .arg(&out)
        .args(["--summary", "-j", "2"])
        .assert()
        .success();

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("a.txt,success,format2,PO-2024-001,Acme Corp,25.00,USD,1,"));
    assert!(lines[2].starts_with("b.txt,success,format3,OC-5531,"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = tempdir().unwrap();
    let pattern = dir.path().join("*.txt");
    poex()
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_get_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("poex.json");

    poex()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    poex()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "validation.default_currency", "EUR"])
        .assert()
        .success();

    poex()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "validation.default_currency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"EUR\""));

    poex()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "classifier.no_such_key", "1"])
        .assert()
        .failure();

    // The configured currency reaches extraction
    poex()
        .arg("--config")
        .arg(&path)
        .args(["extract", "-"])
        .write_stdin("nothing recognizable")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"currency\": \"EUR\""));
}
