//! Integration tests for the JSON tool surface.
//!
//! Drives factory sets through `handle_json` the way a remote client would.

use rackmap_api::{Response, handle_json};
use rackmap_config::get_factory_set;
use rackmap_core::SimHost;
use serde_json::{Value, json};

fn host(set: &str) -> SimHost {
    get_factory_set(set).unwrap().build_host().unwrap()
}

fn call(host: &mut SimHost, tool: &str, params: Value) -> Response {
    let line = json!({ "type": tool, "params": params }).to_string();
    handle_json(host, &line)
}

fn ok(host: &mut SimHost, tool: &str, params: Value) -> Value {
    match call(host, tool, params) {
        Response::Success { result } => result,
        Response::Error { message, code } => panic!("{tool} failed: [{code}] {message}"),
    }
}

fn err(host: &mut SimHost, tool: &str, params: Value) -> (String, String) {
    match call(host, tool, params) {
        Response::Success { result } => panic!("{tool} unexpectedly succeeded: {result}"),
        Response::Error { message, code } => (code, message),
    }
}

fn num(v: &Value) -> f32 {
    v.as_f64().unwrap() as f32
}

// ============================================================================
// Session and track listing
// ============================================================================

#[test]
fn session_overview() {
    let mut h = host("pro-q-rack");
    let info = ok(&mut h, "get_session_info", json!({}));
    assert_eq!(info["track_count"], 2);
    assert_eq!(info["tracks"][0]["name"], "Bus");
    assert_eq!(info["tracks"][1]["device_count"], 1);
}

#[test]
fn track_info_lists_devices() {
    let mut h = host("pro-q-rack");
    let info = ok(&mut h, "get_track_info", json!({"track_index": 0}));
    assert_eq!(info["kind"], "audio");
    assert_eq!(info["devices"][0]["name"], "EQ Rack");
    assert_eq!(info["devices"][0]["kind"], "rack");
    assert_eq!(info["devices"][0]["chain_count"], 1);

    let (code, message) = err(&mut h, "get_track_info", json!({"track_index": 5}));
    assert_eq!(code, "track_not_found");
    assert_eq!(message, "track_index 5 invalid: set has 2 track(s)");
}

#[test]
fn device_parameters_report_identity() {
    let mut h = host("pro-q-rack");
    let d = ok(
        &mut h,
        "get_device_parameters",
        json!({"track_index": 1, "device_index": 0}),
    );
    assert_eq!(d["device_name"], "Compressor");
    assert_eq!(d["device_class"], "Compressor2");
    assert_eq!(d["device_type"], "audio_effect");
    assert_eq!(d["is_plugin"], false);
    assert_eq!(d["parameter_count"], 4);
    let indices: Vec<u64> = d["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, [0, 1, 2, 3]);
}

// ============================================================================
// Rack chains
// ============================================================================

#[test]
fn chain_devices_default_to_first_chain() {
    let mut h = host("pro-q-rack");
    let c = ok(
        &mut h,
        "get_rack_chain_devices",
        json!({"track_index": 0, "device_index": 0}),
    );
    assert_eq!(c["rack_name"], "EQ Rack");
    assert_eq!(c["chain_name"], "Chain 1");
    assert_eq!(c["devices"][0]["name"], "Pro-Q 3");
    assert_eq!(c["devices"][0]["is_plugin"], true);
    assert_eq!(c["devices"][0]["address"], json!([0, 0, 0, 0]));
}

#[test]
fn missing_chain_names_valid_range() {
    let mut h = host("pro-q-rack");
    let (code, message) = err(
        &mut h,
        "get_rack_chain_devices",
        json!({"track_index": 0, "device_index": 0, "chain_index": 2}),
    );
    assert_eq!(code, "chain_not_found");
    assert_eq!(message, "chain_index 2 invalid: rack has 1 chain(s)");
}

#[test]
fn chain_of_non_rack() {
    let mut h = host("pro-q-rack");
    let (code, _) = err(
        &mut h,
        "get_rack_chain_device_parameters",
        json!({"track_index": 1, "device_index": 0, "chain_index": 0, "chain_device_index": 0}),
    );
    assert_eq!(code, "not_a_rack");
}

// ============================================================================
// Macro workflow
// ============================================================================

fn target(parameter_index: i64, macro_index: i64) -> Value {
    json!({
        "track_index": 0,
        "device_index": 0,
        "chain_index": 0,
        "chain_device_index": 0,
        "parameter_index": parameter_index,
        "macro_index": macro_index,
    })
}

#[test]
fn pro_q_macro_scenario() {
    let mut h = host("pro-q-rack");

    let m = ok(&mut h, "map_parameter_to_macro", target(0, 0));
    assert_eq!(m["rack_name"], "EQ Rack");
    assert_eq!(m["macro_name"], "Macro 1");
    assert_eq!(m["target_parameter_name"], "Output Gain");
    assert_eq!(m["target_device_name"], "Pro-Q 3");

    let mappings = ok(
        &mut h,
        "get_rack_macro_mappings",
        json!({"track_index": 0, "device_index": 0}),
    );
    let macros = mappings["macros"].as_array().unwrap();
    assert_eq!(macros.len(), 8);
    assert_eq!(macros[0]["is_mapped"], true);
    assert_eq!(macros[0]["targets"][0]["parameter_name"], "Output Gain");
    assert!(macros[1..].iter().all(|m| m["is_mapped"] == false));

    ok(
        &mut h,
        "set_device_parameter",
        json!({"track_index": 0, "device_index": 0, "parameter_name": "Macro 1", "value": 0.8}),
    );
    let eq = ok(
        &mut h,
        "get_rack_chain_device_parameters",
        json!({"track_index": 0, "device_index": 0, "chain_index": 0, "chain_device_index": 0}),
    );
    assert_eq!(num(&eq["parameters"][0]["value"]), 0.8);
}

#[test]
fn macro_eight_rejected() {
    let mut h = host("pro-q-rack");
    let (code, message) = err(&mut h, "map_parameter_to_macro", target(0, 8));
    assert_eq!(code, "invalid_macro_index");
    assert_eq!(message, "macro_index 8 invalid: racks have 8 macros (0-7)");
}

#[test]
fn negative_indices_never_reach_engine() {
    let mut h = host("pro-q-rack");
    let (code, _) = err(&mut h, "map_parameter_to_macro", target(-1, 0));
    assert_eq!(code, "invalid_request");
    let (code, _) = err(
        &mut h,
        "get_device_parameters",
        json!({"track_index": 0, "device_index": -3}),
    );
    assert_eq!(code, "invalid_request");
    assert_eq!(h.write_count(), 0);
}

#[test]
fn unmap_is_idempotent() {
    let mut h = host("pro-q-rack");
    ok(&mut h, "map_parameter_to_macro", target(0, 2));
    let first = ok(&mut h, "unmap_parameter_from_macro", target(0, 2));
    assert_eq!(first["removed"], true);
    let second = ok(&mut h, "unmap_parameter_from_macro", target(0, 2));
    assert_eq!(second["removed"], false);
}

// ============================================================================
// Parameter writes
// ============================================================================

#[test]
fn batch_reports_each_entry() {
    let mut h = host("pro-q-rack");
    let r = ok(
        &mut h,
        "set_device_parameter",
        json!({
            "track_index": 1,
            "device_index": 0,
            "parameters": [
                {"parameter_name": "Threshold", "value": -20},
                {"parameter_name": "Ratio", "value": 500},
                {"parameter_index": 3, "value": 1},
            ],
        }),
    );
    assert_eq!(r["summary"], "Set 1/3 parameters on device 'Compressor'");
    assert_eq!(r["results"][0]["success"], true);
    assert_eq!(r["results"][1]["code"], "out_of_range");
    assert_eq!(r["results"][2]["code"], "read_only");
    assert_eq!(r["results"][2]["parameter"], 3);
}

#[test]
fn out_of_range_single_write_leaves_value() {
    let mut h = host("pro-q-rack");
    let (code, message) = err(
        &mut h,
        "set_device_parameter",
        json!({"track_index": 1, "device_index": 0, "parameter_name": "Ratio", "value": 500}),
    );
    assert_eq!(code, "out_of_range");
    assert!(message.contains("[1, 100]"), "{message}");

    let d = ok(
        &mut h,
        "get_device_parameters",
        json!({"track_index": 1, "device_index": 0}),
    );
    assert_eq!(num(&d["parameters"][2]["value"]), 4.0);
}

#[test]
fn deep_addresses() {
    let mut h = host("nested-racks");
    let address = json!([0, 0, 0, 1, 0, 0]);
    let d = ok(&mut h, "get_parameters_at", json!({"address": address}));
    assert_eq!(d["device_name"], "ValhallaRoom");
    assert_eq!(d["device_class"], "Vst3PluginDevice");
    assert_eq!(d["is_plugin"], true);

    let s = ok(
        &mut h,
        "set_parameter_at",
        json!({"address": address, "parameter_name": "Mix", "value": 55}),
    );
    assert_eq!(s["name"], "Mix");
    assert_eq!(num(&s["value"]), 55.0);
}

#[test]
fn offline_host_reports_unavailable() {
    let mut h = host("pro-q-rack");
    h.set_offline(Some("remote script not loaded"));
    let (code, message) = err(&mut h, "get_session_info", json!({}));
    assert_eq!(code, "host_unavailable");
    assert_eq!(message, "host unavailable: remote script not loaded");
}

#[test]
fn raw_line_errors() {
    let mut h = host("empty");
    assert!(matches!(
        handle_json(&mut h, "not json"),
        Response::Error { ref code, .. } if code == "invalid_json"
    ));
    assert!(matches!(
        handle_json(&mut h, r#"{"type":"start_playback"}"#),
        Response::Error { ref code, .. } if code == "unknown_tool"
    ));
}
