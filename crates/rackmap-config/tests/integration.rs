//! Integration tests for rackmap-config.
//!
//! Sets go through files, into a simulated host, through the registry and
//! macro engine, and back out through capture.

use rackmap_config::{
    ConfigError, DeviceConfig, LiveSet, ParameterConfig, TrackConfig, factory_sets,
    get_factory_set, load_set,
};
use rackmap_core::{Address, LiveHost, ParamSelector, TrackKind, resolve};
use rackmap_macros::{list_mappings, map, set_macro};
use rackmap_registry::{get_parameter, list_parameters};
use tempfile::TempDir;

// ============================================================================
// File round trips
// ============================================================================

#[test]
fn factory_sets_survive_save_and_load() {
    let dir = TempDir::new().unwrap();
    for set in factory_sets() {
        let path = dir.path().join(format!("{}.toml", set.name));
        set.save(&path).unwrap();
        assert_eq!(LiveSet::load(&path).unwrap(), set, "{}", set.name);
    }
}

#[test]
fn load_set_prefers_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pro-q-rack.toml");
    LiveSet::new("Shadow").save(&path).unwrap();

    let from_file = load_set(path.to_str().unwrap()).unwrap();
    assert_eq!(from_file.name, "Shadow");
    assert_eq!(load_set("pro-q-rack").unwrap().name, "Pro-Q Rack");
}

#[test]
fn unknown_set_is_reported() {
    let err = load_set("definitely-not-a-set").unwrap_err();
    assert!(matches!(err, ConfigError::SetNotFound(ref n) if n == "definitely-not-a-set"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = LiveSet::from_toml("name = ").unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

// ============================================================================
// Building hosts
// ============================================================================

#[test]
fn pro_q_scenario_from_factory_set() {
    let mut host = get_factory_set("pro-q-rack").unwrap().build_host().unwrap();
    let rack = resolve(&host, &Address::new(0, 0)).unwrap();
    let eq_address = Address::new(0, 0).with_chain(0, 0);

    map(&mut host, &rack, 0, &eq_address, &"Output Gain".into()).unwrap();
    set_macro(&mut host, &rack, 0, 0.8).unwrap();

    let eq = resolve(&host, &eq_address).unwrap();
    let gain = get_parameter(&host, &eq, &ParamSelector::Index(0)).unwrap();
    assert_eq!(gain.value, 0.8);
}

#[test]
fn stepped_parameter_snaps_after_build() {
    let mut host = get_factory_set("pro-q-rack").unwrap().build_host().unwrap();
    let rack = resolve(&host, &Address::new(0, 0)).unwrap();
    let eq_address = Address::new(0, 0).with_chain(0, 0);
    map(&mut host, &rack, 3, &eq_address, &"Band 1 Shape".into()).unwrap();
    set_macro(&mut host, &rack, 3, 0.33).unwrap();

    let eq = resolve(&host, &eq_address).unwrap();
    assert_eq!(
        get_parameter(&host, &eq, &"Band 1 Shape".into()).unwrap().value,
        3.0
    );
}

#[test]
fn preset_mappings_drive_nested_racks() {
    let mut host = get_factory_set("nested-racks").unwrap().build_host().unwrap();
    let outer = resolve(&host, &Address::new(0, 0)).unwrap();
    assert_eq!(list_mappings(&host, &outer).unwrap().len(), 2);

    set_macro(&mut host, &outer, 0, 1.0).unwrap();
    let valhalla = resolve(&host, &Address::new(0, 0).with_chain(0, 1).with_chain(0, 0)).unwrap();
    assert_eq!(
        get_parameter(&host, &valhalla, &"Mix".into()).unwrap().value,
        100.0
    );
}

#[test]
fn parameter_listing_reflects_layout() {
    let host = get_factory_set("pro-q-rack").unwrap().build_host().unwrap();
    let comp = resolve(&host, &Address::new(1, 0)).unwrap();
    let names: Vec<String> = list_parameters(&host, &comp)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Device On", "Threshold", "Ratio", "Model"]);
}

#[test]
fn invalid_set_reports_every_problem() {
    let set = LiveSet::new("Broken").with_track(
        TrackConfig::new("A", TrackKind::Audio)
            .with_device(
                DeviceConfig::new("Eq8", "EQ")
                    .with_parameter(ParameterConfig::new("Gain", 9.0, -1.0, 1.0)),
            )
            .with_device(
                DeviceConfig::new("PluginDevice", "X")
                    .with_parameter(ParameterConfig::new("P", 0.0, 1.0, 0.0)),
            ),
    );
    let err = set.build_host().unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("t0/d0 'EQ'"), "{msg}");
    assert!(msg.contains("t0/d1 'X'"), "{msg}");
}

// ============================================================================
// Capture
// ============================================================================

#[test]
fn capture_round_trips_nested_racks() {
    let set = get_factory_set("nested-racks").unwrap();
    let host = set.build_host().unwrap();
    let captured = LiveSet::capture(&host, set.name.clone()).unwrap();
    assert_eq!(captured.tracks, set.tracks);
}

#[test]
fn capture_reflects_edits() {
    let mut host = get_factory_set("pro-q-rack").unwrap().build_host().unwrap();
    let rack = resolve(&host, &Address::new(0, 0)).unwrap();
    let eq_address = Address::new(0, 0).with_chain(0, 0);
    map(&mut host, &rack, 0, &eq_address, &ParamSelector::Index(0)).unwrap();
    set_macro(&mut host, &rack, 0, 0.25).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sets/edited.toml");
    LiveSet::capture(&host, "Edited").unwrap().save(&path).unwrap();

    let rebuilt = LiveSet::load(&path).unwrap().build_host().unwrap();
    let rack = resolve(&rebuilt, &Address::new(0, 0)).unwrap();
    assert_eq!(list_mappings(&rebuilt, &rack).unwrap().len(), 1);
    let eq = resolve(&rebuilt, &eq_address).unwrap();
    assert_eq!(
        get_parameter(&rebuilt, &eq, &ParamSelector::Index(0)).unwrap().value,
        0.25
    );
}

#[test]
fn capture_fails_when_host_is_offline() {
    let mut host = get_factory_set("empty").unwrap().build_host().unwrap();
    host.set_offline(Some("closed"));
    assert!(host.track_count().is_err());
    assert!(matches!(
        LiveSet::capture(&host, "x"),
        Err(ConfigError::Host(_))
    ));
}
