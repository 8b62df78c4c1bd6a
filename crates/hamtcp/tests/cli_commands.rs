#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn hamtcp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hamtcp"))
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("hamtcp should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn unique_temp_file(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "hamtcp-{tag}-{}-{}.bin",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_command_then_decode_it() {
    let encoded = hamtcp(&[
        "--format", "pretty", "encode", "command", "--dest", "1:1:257", "--src", "2:1:65535",
        "--seq", "5", "--interface", "1", "--method", "4", "--param", "i32:100",
    ]);
    assert!(encoded.status.success());
    let hex = stdout(&encoded);
    assert!(hex.starts_with("2800063000"), "unexpected prefix: {hex}");

    let decoded = hamtcp(&["--format", "json", "decode", &hex]);
    assert!(decoded.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&decoded)).expect("decode output should be JSON");
    assert_eq!(json["envelope"]["protocol"], 6);
    assert_eq!(json["harp"]["dst"], "1:1:257");
    assert_eq!(json["harp"]["seq"], 5);
    assert_eq!(json["hoi"]["action_id"], 4);
    assert_eq!(json["hoi"]["fragments"][0]["type_name"], "i32");
    assert_eq!(json["hoi"]["fragments"][0]["value"], "100");
}

#[test]
fn encode_init_json_reports_length() {
    let output = hamtcp(&["--format", "json", "encode", "init", "--timeout", "30"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("JSON output");
    assert_eq!(json["kind"], "init");
    assert_eq!(json["length"], 28);
    assert!(json["hex"].as_str().unwrap().starts_with("1a000730"));
}

#[test]
fn decode_reads_binary_capture_with_two_packets() {
    let first = hamtcp(&["--format", "pretty", "encode", "init"]);
    let second = hamtcp(&[
        "--format", "pretty", "encode", "command", "--dest", "1:1:48896", "--src", "2:1:65535",
        "--interface", "1", "--method", "3", "--action", "0",
    ]);
    let mut capture = hex::decode(stdout(&first)).expect("valid hex");
    capture.extend(hex::decode(stdout(&second)).expect("valid hex"));
    let path = unique_temp_file("capture");
    std::fs::write(&path, &capture).expect("capture should be writable");

    let output = hamtcp(&["--format", "json", "decode", "--file", path.to_str().unwrap()]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());
    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"connection\""));
    assert!(lines[1].contains("\"STATUS_REQUEST\""));
}

#[test]
fn truncated_packet_exits_60() {
    let output = hamtcp(&["decode", "0a0006300000"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn invalid_hex_exits_60() {
    let output = hamtcp(&["decode", "not-hex"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn unknown_param_type_exits_64() {
    let output = hamtcp(&[
        "encode", "command", "--dest", "1:1:257", "--src", "2:1:65535", "--interface", "1",
        "--method", "4", "--param", "i128:1",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_prints_package_version() {
    let output = hamtcp(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        format!("hamtcp {}", env!("CARGO_PKG_VERSION"))
    );
}
