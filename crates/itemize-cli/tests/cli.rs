use std::fs;
use std::path::Path;

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Run the binary with an isolated config directory.
fn itemize(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("itemize").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

#[test]
fn parse_inline_text_as_json() {
    let home = TempDir::new().unwrap();
    let output = itemize(home.path())
        .args(["parse", "--text", "Sugar – Rs. 6,000 (50 kg)"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let item = &json["results"][0]["items"][0];

    assert_eq!(json["request_id"].as_str().map(str::len), Some(64));
    assert_eq!(json["results"][0]["input_index"], 0);
    assert_eq!(item["product_name"], "Sugar");
    assert_eq!(item["quantity"], 50.0);
    assert_eq!(item["unit"], "kg");
    assert_eq!(item["price"], 6000.0);
    assert_eq!(item["price_type"], "total");
    assert_eq!(item["derived_unit_price"], 120.0);
    assert_eq!(item["confidence"], 1.0);
}

#[test]
fn parse_stdin() {
    let home = TempDir::new().unwrap();
    let output = itemize(home.path())
        .arg("parse")
        .write_stdin("Wheat Flour (10kg @ 950)\nThank you\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let items = json["results"][0]["items"].as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_name"], "Wheat Flour");
    assert_eq!(items[0]["price_type"], "unit");
}

#[test]
fn parse_multiple_texts_keeps_input_order() {
    let home = TempDir::new().unwrap();
    let output = itemize(home.path())
        .args(["parse", "-t", "Salt - 80", "-t", "Total: 500"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);

    assert_eq!(json["results"][0]["input_index"], 0);
    assert_eq!(json["results"][0]["items"][0]["product_name"], "Salt");
    assert_eq!(json["results"][1]["input_index"], 1);
    assert_eq!(json["results"][1]["items"], Value::Array(vec![]));
}

#[test]
fn parse_is_deterministic() {
    let home = TempDir::new().unwrap();
    let run = || {
        itemize(home.path())
            .args(["parse", "--text", "Rice 2.5 kg 1,000.75"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };

    assert_eq!(run(), run());
}

#[test]
fn parse_file_as_csv() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("receipt.txt");
    fs::write(&input, "Salt - 80\nInvoice No 42\n").unwrap();

    itemize(home.path())
        .args(["parse", "-f", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "input_index,product_name,quantity,unit,price,price_type,derived_unit_price,raw_line,confidence",
        ))
        .stdout(predicate::str::contains("0,Salt,,,80,total,,Salt - 80,0.700"));
}

#[test]
fn parse_min_confidence_drops_weak_items() {
    let home = TempDir::new().unwrap();
    let output = itemize(home.path())
        .args(["parse", "--min-confidence", "0.9", "--text"])
        .arg("Sugar – Rs. 6,000 (50 kg)\nSalt - 80")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json = stdout_json(&output);
    let items = json["results"][0]["items"].as_array().unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_name"], "Sugar");
}

#[test]
fn parse_rejects_out_of_range_confidence() {
    let home = TempDir::new().unwrap();
    itemize(home.path())
        .args(["parse", "--min-confidence", "1.5", "--text", "Salt - 80"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_confidence"));
}

#[test]
fn parse_rejects_oversized_input() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("small.json");
    fs::write(&config, r#"{"extraction": {"max_input_chars": 10}}"#).unwrap();

    itemize(home.path())
        .arg("-c")
        .arg(&config)
        .args(["parse", "--text", "Sugar – Rs. 6,000 (50 kg)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("index 0"));
}

#[test]
fn parse_writes_output_file() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("items.txt");

    itemize(home.path())
        .args(["parse", "-f", "text", "--text", "Milk 2 l 120", "-o"])
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("Input 0 (1 items)"));
    assert!(written.contains("Milk"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("inputs");
    let out = home.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), "Sugar – Rs. 6,000 (50 kg)\nSalt - 80\n").unwrap();
    fs::write(inputs.join("b.txt"), "Thank you for shopping\n").unwrap();

    itemize(home.path())
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("-d")
        .arg(&out)
        .args(["--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful"));

    let a: Value = serde_json::from_str(&fs::read_to_string(out.join("a.json")).unwrap()).unwrap();
    assert_eq!(a["results"][0]["items"].as_array().map(Vec::len), Some(2));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines[0],
        "filename,status,items,mean_confidence,processing_time_ms,error"
    );
    assert!(lines[1].starts_with("a.txt,success,2,0.85,"));
    assert!(lines[2].starts_with("b.txt,success,0,,"));
}

#[test]
fn batch_fails_without_matches() {
    let home = TempDir::new().unwrap();
    itemize(home.path())
        .arg("batch")
        .arg(format!("{}/*.txt", home.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn batch_continue_on_error_reports_failures() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("inputs");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("good.txt"), "Salt - 80\n").unwrap();
    fs::write(inputs.join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();

    let pattern = format!("{}/*.txt", inputs.display());

    itemize(home.path())
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.txt"));

    itemize(home.path())
        .arg("batch")
        .arg(&pattern)
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"))
        .stdout(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn config_set_get_roundtrip() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("itemize.json");

    itemize(home.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.min_confidence", "0.5"])
        .assert()
        .success();

    itemize(home.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.min_confidence"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5"));

    itemize(home.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.bogus", "1"])
        .assert()
        .failure();
}

#[test]
fn config_init_refuses_to_overwrite() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("itemize.json");

    itemize(home.path())
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .success();
    assert!(config.exists());

    itemize(home.path())
        .args(["config", "init", "-o"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
