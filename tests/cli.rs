use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn write_inputs(dir: &Path) {
    fs::write(dir.join("pairs.txt"), "city country 1\n").unwrap();
    fs::create_dir(dir.join("instances")).unwrap();
    fs::write(dir.join("instances").join("city"), "paris tokyo").unwrap();
    fs::write(dir.join("instances").join("country"), "france japan").unwrap();
    fs::write(
        dir.join("svo.tsv"),
        "paris\tis capital of\tfrance\t5\nparis\tlocated in\tfrance\t3\n",
    )
    .unwrap();
}

fn ontext(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ontext"))
        .arg(dir.join("pairs.txt"))
        .arg(dir.join("instances"))
        .arg(dir.join("svo.tsv"))
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn positional_arguments_print_text_report() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let output = ontext(dir.path(), &[]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "# city country\nis capital of\tlocated in\t\n0.5\t0.5\t\n0.5\t0.5\t\n\n\n"
    );
}

#[test]
fn json_report_written_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    let out = dir.path().join("report.jsonl");

    let output = ontext(
        dir.path(),
        &["--format", "json", "--output", out.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let text = fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(value["labels"][0], "is capital of");
    assert_eq!(value["matrix"][1][0], 0.5);
}

#[test]
fn fatal_error_exits_non_zero_without_report() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::remove_file(dir.path().join("instances").join("country")).unwrap();

    let output = ontext(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no instance file for category 'country'"));
}

#[test]
fn bad_frequency_names_line_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());
    fs::write(dir.path().join("svo.tsv"), "paris\tis in\tfrance\tlots\n").unwrap();

    let output = ontext(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("svo.tsv:1:"));
}

#[test]
fn missing_positional_is_a_usage_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_ontext"))
        .arg("pairs.txt")
        .output()
        .unwrap();
    assert!(!output.status.success());
}
