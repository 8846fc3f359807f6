//! Factory sets bundled with rackmap.
//!
//! Built-in set descriptions that are always available without external
//! files. They load into a simulated host for trying tools out and for tests.

use crate::LiveSet;

/// Array of factory set names for external access.
pub static FACTORY_SET_NAMES: &[&str] = &["empty", "pro-q-rack", "nested-racks"];

/// TOML content for factory sets, embedded at compile time.
static FACTORY_SETS_TOML: &[(&str, &str)] = &[
    ("empty", EMPTY_SET),
    ("pro-q-rack", PRO_Q_RACK_SET),
    ("nested-racks", NESTED_RACKS_SET),
];

/// One empty audio track.
const EMPTY_SET: &str = r#"
name = "Empty"
description = "One audio track, no devices"

[[tracks]]
name = "1-Audio"
kind = "audio"
"#;

/// Audio Effect Rack holding Pro-Q 3 on its first chain, plus a second track
/// with a compressor.
const PRO_Q_RACK_SET: &str = r#"
name = "Pro-Q Rack"
description = "Audio Effect Rack with Pro-Q 3 on chain 1, ready for macro mapping"

[[tracks]]
name = "Bus"
kind = "audio"

[[tracks.devices]]
name = "EQ Rack"
class = "AudioEffectGroupDevice"

[[tracks.devices.chains]]
name = "Chain 1"

[[tracks.devices.chains.devices]]
name = "Pro-Q 3"
class = "PluginDevice"

[[tracks.devices.chains.devices.parameters]]
name = "Output Gain"
value = 0.5
min = 0.0
max = 1.0

[[tracks.devices.chains.devices.parameters]]
name = "Band 1 Frequency"
value = 1000.0
min = 10.0
max = 30000.0

[[tracks.devices.chains.devices.parameters]]
name = "Band 1 Shape"
value = 0.0
min = 0.0
max = 8.0
quantized = true
steps = 9

[[tracks]]
name = "Vocals"
kind = "audio"

[[tracks.devices]]
name = "Compressor"
class = "Compressor2"

[[tracks.devices.parameters]]
name = "Threshold"
value = -12.0
min = -60.0
max = 0.0

[[tracks.devices.parameters]]
name = "Ratio"
value = 4.0
min = 1.0
max = 100.0

[[tracks.devices.parameters]]
name = "Model"
value = 0.0
min = 0.0
max = 2.0
quantized = true
automatable = false
"#;

/// Instrument rack driving a nested effect rack, plus a return track.
const NESTED_RACKS_SET: &str = r#"
name = "Nested Racks"
description = "Instrument Rack whose Space macro drives a nested Audio Effect Rack"

[[tracks]]
name = "Keys"
kind = "midi"

[[tracks.devices]]
name = "Outer"
class = "InstrumentGroupDevice"

[[tracks.devices.macros]]
index = 0
name = "Space"

[[tracks.devices.macros]]
index = 1
name = "Volume"
min = -36.0
max = 0.0
value = -6.0

[[tracks.devices.mappings]]
macro_index = 0
target = [0, 1]
parameter = 1

[[tracks.devices.mappings]]
macro_index = 1
target = [0, 0]
parameter = 1

[[tracks.devices.chains]]
name = "Layer"

[[tracks.devices.chains.devices]]
name = "Operator"
class = "Operator"
role = "instrument"

[[tracks.devices.chains.devices.parameters]]
name = "Volume"
value = -6.0
min = -36.0
max = 0.0

[[tracks.devices.chains.devices]]
name = "Inner"
class = "AudioEffectGroupDevice"

[[tracks.devices.chains.devices.mappings]]
macro_index = 0
target = [0, 0]
parameter = 0

[[tracks.devices.chains.devices.chains]]
name = "FX"

[[tracks.devices.chains.devices.chains.devices]]
name = "ValhallaRoom"
class = "Vst3PluginDevice"

[[tracks.devices.chains.devices.chains.devices.parameters]]
name = "Mix"
value = 30.0
min = 0.0
max = 100.0

[[tracks.devices.chains.devices.chains.devices.parameters]]
name = "Decay"
value = 2.5
min = 0.1
max = 20.0

[[tracks]]
name = "A-Reverb"
kind = "return"

[[tracks.devices]]
name = "Reverb"
class = "Reverb"
"#;

/// Get all factory sets.
///
/// # Example
///
/// ```rust
/// use rackmap_config::factory_sets;
///
/// for set in factory_sets() {
///     println!("{}: {:?}", set.name, set.description);
/// }
/// ```
pub fn factory_sets() -> Vec<LiveSet> {
    FACTORY_SETS_TOML
        .iter()
        .filter_map(|(_, toml)| LiveSet::from_toml(toml).ok())
        .collect()
}

/// Get a factory set by name.
///
/// Matches the short name (`pro-q-rack`) or the display name (`Pro-Q Rack`),
/// case-insensitively.
///
/// ```rust
/// use rackmap_config::get_factory_set;
///
/// let set = get_factory_set("pro-q-rack").unwrap();
/// assert_eq!(set.name, "Pro-Q Rack");
/// assert!(get_factory_set("Pro-Q Rack").is_some());
/// ```
pub fn get_factory_set(name: &str) -> Option<LiveSet> {
    let name_lower = name.to_lowercase();

    for (set_name, toml) in FACTORY_SETS_TOML {
        if set_name.to_lowercase() == name_lower {
            return LiveSet::from_toml(toml).ok();
        }
    }

    FACTORY_SETS_TOML
        .iter()
        .filter_map(|(_, toml)| LiveSet::from_toml(toml).ok())
        .find(|set| set.name.to_lowercase() == name_lower)
}

/// Short names of all factory sets.
pub fn factory_set_names() -> Vec<&'static str> {
    FACTORY_SET_NAMES.to_vec()
}

/// True if `name` is a factory set's short or display name.
pub fn is_factory_set(name: &str) -> bool {
    get_factory_set(name).is_some()
}
