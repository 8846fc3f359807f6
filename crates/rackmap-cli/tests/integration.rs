//! Integration tests for rackmap-cli.
//!
//! Every test runs the real binary with `XDG_CONFIG_HOME` pointed at a
//! temporary directory, so the user's own config and sets never leak in.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

/// Command for the `rackmap` binary built by cargo, isolated in `home`.
fn rackmap(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rackmap"));
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be one JSON document")
}

fn param<'a>(params: &'a Value, name: &str) -> &'a Value {
    params["parameters"]
        .as_array()
        .expect("parameters array")
        .iter()
        .find(|p| p["name"] == name)
        .unwrap_or_else(|| panic!("no parameter '{name}'"))
}

// ---------------------------------------------------------------------------
// `rackmap call`
// ---------------------------------------------------------------------------

#[test]
fn call_session_info() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["--set", "pro-q-rack", "call", "get_session_info"])
        .output()
        .expect("failed to run rackmap call");

    assert!(output.status.success(), "get_session_info failed");
    let response = stdout_json(&output);
    assert_eq!(response["status"], "success");
    assert_eq!(response["result"]["track_count"], 2);
}

#[test]
fn call_defaults_to_empty_set() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["call", "get_session_info"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["result"]["track_count"], 1);
}

#[test]
fn call_reads_set_from_config() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("engine.toml");
    std::fs::write(&config, "[host]\nset = \"nested-racks\"\n").unwrap();

    let output = rackmap(&home)
        .arg("--config")
        .arg(&config)
        .args(["call", "get_track_info", r#"{"track_index": 0}"#])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["result"]["name"], "Keys");
}

#[test]
fn call_unknown_tool_fails() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["call", "delete_everything"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let response = stdout_json(&output);
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "unknown_tool");
}

#[test]
fn call_rejects_malformed_params() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["call", "get_track_info", "{track_index: 0"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not valid JSON"), "stderr: {stderr}");
}

#[test]
fn call_list_prints_tools() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home).args(["call", "--list"]).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for tool in [
        "get_session_info",
        "map_parameter_to_macro",
        "get_rack_macro_mappings",
    ] {
        assert!(stdout.contains(tool), "missing {tool}");
    }
}

#[test]
fn call_save_persists_edit() {
    let home = TempDir::new().unwrap();
    let saved = home.path().join("edited.toml");

    let output = rackmap(&home)
        .args([
            "--set",
            "pro-q-rack",
            "call",
            "set_device_parameter",
            r#"{"track_index": 1, "device_index": 0, "parameter_name": "Threshold", "value": -20}"#,
            "--save",
        ])
        .arg(&saved)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(saved.is_file());

    let output = rackmap(&home)
        .arg("--set")
        .arg(&saved)
        .args([
            "call",
            "get_device_parameters",
            r#"{"track_index": 1, "device_index": 0}"#,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let result = &stdout_json(&output)["result"];
    assert_eq!(param(result, "Threshold")["value"].as_f64(), Some(-20.0));
}

// ---------------------------------------------------------------------------
// `rackmap serve`
// ---------------------------------------------------------------------------

#[test]
fn serve_answers_each_line() {
    let home = TempDir::new().unwrap();
    let mut child = rackmap(&home)
        .args(["--set", "pro-q-rack", "serve"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let requests = [
        r#"{"type": "get_session_info"}"#,
        "",
        r#"{"type": "map_parameter_to_macro", "params": {"track_index": 0, "device_index": 0, "chain_index": 0, "chain_device_index": 0, "parameter_index": 1, "macro_index": 0}}"#,
        "not json",
        r#"{"type": "get_rack_macro_mappings", "params": {"track_index": 0, "device_index": 0}}"#,
    ];
    {
        let mut stdin = child.stdin.take().unwrap();
        for line in requests {
            writeln!(stdin, "{line}").unwrap();
        }
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let responses: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 4, "blank lines get no response");

    assert_eq!(responses[0]["status"], "success");
    assert_eq!(responses[1]["status"], "success");
    assert_eq!(responses[2]["code"], "invalid_json");

    let macros = responses[3]["result"]["macros"].as_array().unwrap();
    let bound = macros.iter().filter(|m| m["is_mapped"] == true).count();
    assert_eq!(bound, 1);
}

#[test]
fn serve_save_only_after_changes() {
    let home = TempDir::new().unwrap();
    let saved = home.path().join("session.toml");

    let mut child = rackmap(&home)
        .args(["--set", "pro-q-rack", "serve", "--save"])
        .arg(&saved)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, r#"{{"type": "get_session_info"}}"#).unwrap();
    }
    assert!(child.wait_with_output().unwrap().status.success());
    assert!(!saved.exists(), "read-only session should not save");
}

// ---------------------------------------------------------------------------
// `rackmap tree`
// ---------------------------------------------------------------------------

#[test]
fn tree_shows_nested_chains() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["--set", "nested-racks", "tree"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Keys"));
    assert!(stdout.contains("chain 0: Layer"));
    assert!(stdout.contains("chain 0: FX"));
    assert!(stdout.contains("ValhallaRoom"));
    assert!(stdout.contains("A-Reverb"));
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(
        lines.contains(&"    macro 1 'Volume' -> t0/d0/c0/d0 'Operator' #1 Volume"),
        "outer rack binding missing:\n{stdout}"
    );
    assert!(
        lines.contains(&"        macro 0 'Macro 1' -> t0/d0/c0/d1/c0/d0 'ValhallaRoom' #0 Mix"),
        "inner rack binding missing:\n{stdout}"
    );
}

#[test]
fn tree_with_parameters() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["--set", "pro-q-rack", "tree", "--parameters", "--track", "1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Threshold"));
    assert!(stdout.contains("[quantized]"));
    assert!(!stdout.contains("Pro-Q 3"), "track filter should hide track 0");
}

#[test]
fn tree_track_out_of_range() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["tree", "--track", "4"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `rackmap sets`
// ---------------------------------------------------------------------------

#[test]
fn sets_list_shows_factory_sets() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["sets", "list", "--factory"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Factory Sets"));
    assert!(stdout.contains("Pro-Q Rack"));
    assert!(stdout.contains("Empty"));
}

#[test]
fn sets_export_then_list() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["sets", "export", "pro-q-rack"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let again = rackmap(&home)
        .args(["sets", "export", "pro-q-rack"])
        .output()
        .unwrap();
    assert!(!again.status.success(), "export should not overwrite");

    let output = rackmap(&home)
        .args(["sets", "list", "--user"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pro-q-rack"));
}

#[test]
fn sets_show_prints_toml() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["sets", "show", "nested-racks"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[[tracks]]"));
    assert!(stdout.contains("ValhallaRoom"));
}

#[test]
fn unknown_set_fails() {
    let home = TempDir::new().unwrap();
    let output = rackmap(&home)
        .args(["--set", "no-such-set", "call", "get_session_info"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}
