//! Device classification.
//!
//! The host reports a class name per device (`PluginDevice`,
//! `AudioEffectGroupDevice`, `Compressor2`, ...). [`DeviceClass`] parses the
//! names the engine cares about and [`classify`] collapses them to the closed
//! [`DeviceKind`] tag the rest of the engine dispatches on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::RawDevice;

/// What a device is, as far as addressing and parameters are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Built-in host device.
    Native,
    /// Third-party plugin wrapper.
    Plugin,
    /// Container with parallel chains and 8 macros.
    Rack,
}

impl DeviceKind {
    /// Lowercase name used in messages and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceKind::Native => "native",
            DeviceKind::Plugin => "plugin",
            DeviceKind::Rack => "rack",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-reported device class.
///
/// Unknown class names fall into [`DeviceClass::Native`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Instrument Rack.
    InstrumentRack,
    /// Audio Effect Rack.
    AudioEffectRack,
    /// MIDI Effect Rack.
    MidiEffectRack,
    /// Drum Rack.
    DrumRack,
    /// VST2 plugin wrapper.
    Vst,
    /// VST3 plugin wrapper.
    Vst3,
    /// Audio Unit plugin wrapper.
    AudioUnit,
    /// AAX plugin wrapper.
    Aax,
    /// Any built-in device.
    Native,
}

impl DeviceClass {
    /// Parses a host class name.
    pub fn from_class_name(name: &str) -> Self {
        match name {
            "InstrumentGroupDevice" => DeviceClass::InstrumentRack,
            "AudioEffectGroupDevice" => DeviceClass::AudioEffectRack,
            "MidiEffectGroupDevice" => DeviceClass::MidiEffectRack,
            "DrumGroupDevice" => DeviceClass::DrumRack,
            "PluginDevice" => DeviceClass::Vst,
            "Vst3PluginDevice" => DeviceClass::Vst3,
            "AuPluginDevice" => DeviceClass::AudioUnit,
            "AaxPluginDevice" => DeviceClass::Aax,
            _ => DeviceClass::Native,
        }
    }

    /// Canonical host class name, or `None` for [`DeviceClass::Native`].
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            DeviceClass::InstrumentRack => Some("InstrumentGroupDevice"),
            DeviceClass::AudioEffectRack => Some("AudioEffectGroupDevice"),
            DeviceClass::MidiEffectRack => Some("MidiEffectGroupDevice"),
            DeviceClass::DrumRack => Some("DrumGroupDevice"),
            DeviceClass::Vst => Some("PluginDevice"),
            DeviceClass::Vst3 => Some("Vst3PluginDevice"),
            DeviceClass::AudioUnit => Some("AuPluginDevice"),
            DeviceClass::Aax => Some("AaxPluginDevice"),
            DeviceClass::Native => None,
        }
    }

    /// True for the four rack container classes.
    pub fn is_rack(self) -> bool {
        matches!(
            self,
            DeviceClass::InstrumentRack
                | DeviceClass::AudioEffectRack
                | DeviceClass::MidiEffectRack
                | DeviceClass::DrumRack
        )
    }

    /// True for third-party plugin wrappers.
    pub fn is_plugin(self) -> bool {
        matches!(
            self,
            DeviceClass::Vst | DeviceClass::Vst3 | DeviceClass::AudioUnit | DeviceClass::Aax
        )
    }

    /// Role a rack of this class plays in its signal chain.
    pub fn rack_role(self) -> Option<DeviceRole> {
        match self {
            DeviceClass::InstrumentRack | DeviceClass::DrumRack => Some(DeviceRole::Instrument),
            DeviceClass::AudioEffectRack => Some(DeviceRole::AudioEffect),
            DeviceClass::MidiEffectRack => Some(DeviceRole::MidiEffect),
            _ => None,
        }
    }
}

/// Signal-chain role reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    /// Generates audio from MIDI.
    Instrument,
    /// Processes audio.
    AudioEffect,
    /// Processes MIDI.
    MidiEffect,
    /// Not reported.
    #[default]
    Unknown,
}

impl DeviceRole {
    /// Snake-case name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceRole::Instrument => "instrument",
            DeviceRole::AudioEffect => "audio_effect",
            DeviceRole::MidiEffect => "midi_effect",
            DeviceRole::Unknown => "unknown",
        }
    }
}

/// Classifies a raw host device.
///
/// Racks win over plugins; chain count plays no part.
pub fn classify(device: &RawDevice) -> DeviceKind {
    let class = DeviceClass::from_class_name(&device.class_name);
    if class.is_rack() {
        DeviceKind::Rack
    } else if class.is_plugin() {
        DeviceKind::Plugin
    } else {
        DeviceKind::Native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::DeviceId;

    fn raw(class_name: &str) -> RawDevice {
        RawDevice {
            id: DeviceId(1),
            name: "dev".into(),
            class_name: class_name.into(),
            role: DeviceRole::Unknown,
        }
    }

    #[test]
    fn racks() {
        for name in [
            "InstrumentGroupDevice",
            "AudioEffectGroupDevice",
            "MidiEffectGroupDevice",
            "DrumGroupDevice",
        ] {
            assert_eq!(classify(&raw(name)), DeviceKind::Rack, "{name}");
        }
    }

    #[test]
    fn plugins() {
        for name in [
            "PluginDevice",
            "Vst3PluginDevice",
            "AuPluginDevice",
            "AaxPluginDevice",
        ] {
            assert_eq!(classify(&raw(name)), DeviceKind::Plugin, "{name}");
        }
    }

    #[test]
    fn everything_else_is_native() {
        for name in ["Compressor2", "Eq8", "OriginalSimpler", ""] {
            assert_eq!(classify(&raw(name)), DeviceKind::Native, "{name:?}");
        }
    }

    #[test]
    fn class_names_round_trip() {
        for class in [
            DeviceClass::InstrumentRack,
            DeviceClass::AudioEffectRack,
            DeviceClass::MidiEffectRack,
            DeviceClass::DrumRack,
            DeviceClass::Vst,
            DeviceClass::Vst3,
            DeviceClass::AudioUnit,
            DeviceClass::Aax,
        ] {
            let name = class.class_name().unwrap();
            assert_eq!(DeviceClass::from_class_name(name), class);
        }
    }

    #[test]
    fn kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeviceKind::Rack).unwrap(),
            "\"rack\""
        );
        assert_eq!(DeviceRole::AudioEffect.as_str(), "audio_effect");
    }
}
