/// Exercises the `jtd-validate` example binary end to end: writes a schema
/// and instance to a temp dir, runs the binary, checks its exit code and
/// stdout.
use std::io::Write;
use std::process::Command;

fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

fn run(schema_path: &std::path::Path, instance_path: &std::path::Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_jtd-validate"))
        .arg(schema_path)
        .arg(instance_path)
        .output()
        .expect("spawn jtd-validate")
}

#[test]
fn valid_instance_exits_zero_with_empty_error_list() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_temp(&dir, "schema.json", r#"{"type": "string"}"#);
    let instance = write_temp(&dir, "instance.json", r#""hello""#);

    let out = run(&schema, &instance);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn invalid_instance_exits_nonzero_with_errors() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_temp(&dir, "schema.json", r#"{"type": "string"}"#);
    let instance = write_temp(&dir, "instance.json", "42");

    let out = run(&schema, &instance);
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn invalid_schema_exits_nonzero_with_no_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let schema = write_temp(&dir, "schema.json", r#"{"type": "string", "enum": ["a"]}"#);
    let instance = write_temp(&dir, "instance.json", r#""a""#);

    let out = run(&schema, &instance);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}
