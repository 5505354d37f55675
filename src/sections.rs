//! Typed views of the Blender settings sections.
//!
//! Host bindings read these instead of walking dotted paths. Field values
//! are passed through as declared; nothing here interprets them.

use crate::resolver::tree::Section;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitScaleSettings {
    pub enabled: bool,
    pub apply_on_opening: bool,
    pub base_file_unit_scale: f64,
}

impl Section for UnitScaleSettings {
    const PATH: &'static str = "unit_scale_settings";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcioConfig {
    pub override_global_config: bool,
    pub filepath: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRule {
    pub pattern: String,
    pub colorspace: String,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRules {
    pub activate_host_rules: bool,
    pub rules: BTreeMap<String, FileRule>,
}

/// Color management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageIo {
    pub activate_host_color_management: bool,
    pub ocio_config: OcioConfig,
    pub file_rules: FileRules,
}

impl Section for ImageIo {
    const PATH: &'static str = "imageio";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPass {
    pub attribute: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub default_render_image_folder: String,
    pub aov_separator: String,
    pub image_format: String,
    pub multilayer_exr: bool,
    pub aov_list: Vec<String>,
    pub custom_passes: Vec<CustomPass>,
}

impl Section for RenderSettings {
    const PATH: &'static str = "RenderSettings";
}

/// Per-platform path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPath {
    pub windows: String,
    pub darwin: String,
    pub linux: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTemplate {
    pub task_types: Vec<String>,
    pub path: PlatformPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkfileBuilder {
    pub create_first_version: bool,
    pub custom_templates: Vec<CustomTemplate>,
}

impl Section for WorkfileBuilder {
    const PATH: &'static str = "workfile_builder";
}
