//! Named preset selection for plugins with a `presets` mapping.

use crate::error::SettingsError;
use crate::publish::plugins::PluginControl;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Preset used when no entry matches the requested key
pub const DEFAULT_PRESET: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetMatch {
    Exact,
    Default,
}

/// A preset picked for a plugin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub matched: PresetMatch,
    pub settings: Value,
}

/// Pick a preset by key.
///
/// The key is matched exactly (case-sensitive). When no entry has that key
/// the `default` entry is returned; when there is no `default` either, or
/// the plugin has no presets at all, the selection fails with
/// `NoMatchingPreset` listing what is available.
pub fn select(control: &PluginControl, key: &str) -> Result<Preset, SettingsError> {
    let no_match = |available: Vec<String>| SettingsError::NoMatchingPreset {
        plugin: control.name.clone(),
        key: key.to_string(),
        available,
    };

    let presets = control.presets().ok_or_else(|| no_match(Vec::new()))?;

    let (name, matched) = if presets.contains_key(key) {
        (key, PresetMatch::Exact)
    } else if presets.contains_key(DEFAULT_PRESET) {
        (DEFAULT_PRESET, PresetMatch::Default)
    } else {
        let mut available: Vec<String> = presets.keys().cloned().collect();
        available.sort();
        return Err(no_match(available));
    };

    debug!(plugin = %control.name, key, preset = name, "Selected preset");
    Ok(Preset {
        name: name.to_string(),
        matched,
        settings: presets[name].clone(),
    })
}
