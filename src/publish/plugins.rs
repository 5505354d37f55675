//! Plugin control records projected from the `publish` group.

use crate::error::SettingsError;
use crate::resolver::tree::ResolvedTree;
use crate::schema::{blender::PUBLISH, path, value_shape};
use serde::Serialize;
use serde_json::{Map, Value};

const TRIPLE: [&str; 3] = ["enabled", "optional", "active"];

/// Control flags of one publish plugin plus its remaining settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginControl {
    pub name: String,
    pub enabled: bool,
    pub optional: bool,
    pub active: bool,
    /// Plugin-specific keys, passed through untouched
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl PluginControl {
    fn from_value(name: &str, at: &str, value: &Value) -> Result<Self, SettingsError> {
        let object = value.as_object().ok_or_else(|| SettingsError::SchemaMismatch {
            path: at.to_string(),
            reason: format!("expected plugin settings group, found {}", value_shape(value)),
        })?;

        let flag = |key: &str| -> Result<bool, SettingsError> {
            let flag_path = path::join(at, key);
            match object.get(key) {
                Some(Value::Bool(b)) => Ok(*b),
                Some(other) => Err(SettingsError::SchemaMismatch {
                    path: flag_path,
                    reason: format!("expected boolean, found {}", value_shape(other)),
                }),
                None => Err(SettingsError::SchemaMismatch {
                    path: flag_path,
                    reason: "plugin control flag is missing".to_string(),
                }),
            }
        };

        let extra = object
            .iter()
            .filter(|(key, _)| !TRIPLE.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            name: name.to_string(),
            enabled: flag("enabled")?,
            optional: flag("optional")?,
            active: flag("active")?,
            extra,
        })
    }

    /// The plugin's `presets` mapping, if it has one
    pub fn presets(&self) -> Option<&Map<String, Value>> {
        self.extra.get("presets").and_then(Value::as_object)
    }

    /// Whether the pipeline should run this plugin by default
    pub fn runs_by_default(&self) -> bool {
        self.enabled && self.active
    }
}

/// Control records for every plugin under `publish`, in declaration order
pub fn plugins(tree: &ResolvedTree) -> Result<Vec<PluginControl>, SettingsError> {
    plugins_in(tree, PUBLISH)
}

/// Control records for every plugin declared under `group`
pub fn plugins_in(tree: &ResolvedTree, group: &str) -> Result<Vec<PluginControl>, SettingsError> {
    let declared = tree.schema().children_of(group)?;
    let resolved = tree.get(group)?;

    declared
        .iter()
        .map(|node| {
            let at = path::join(group, &node.name);
            let value = resolved
                .get(&node.name)
                .ok_or_else(|| SettingsError::SchemaMismatch {
                    path: at.clone(),
                    reason: "declared plugin is missing from the resolved tree".to_string(),
                })?;
            PluginControl::from_value(&node.name, &at, value)
        })
        .collect()
}

/// Control record of a single plugin under `publish`
pub fn plugin(tree: &ResolvedTree, name: &str) -> Result<PluginControl, SettingsError> {
    let at = path::join(PUBLISH, name);
    tree.schema().describe(&at)?;
    PluginControl::from_value(name, &at, tree.get(&at)?)
}
