//! Built-in schema for the Blender host integration.
//!
//! Mirrors the factory defaults shipped with the pipeline: unit scale,
//! startup behaviour, color management, render output, workfile scaffolding
//! and the publish plugins with their thumbnail/playblast presets.

use super::{Kind, Schema, SchemaNode};
use crate::error::SettingsError;
use serde_json::json;

/// Name of the group holding publish plugins
pub const PUBLISH: &str = "publish";

const AOV_NAMES: &[&str] = &[
    "empty",
    "combined",
    "z",
    "mist",
    "normal",
    "diffuse_light",
    "diffuse_color",
    "specular_light",
    "specular_color",
    "volume_light",
    "emission",
    "environment",
    "shadow",
    "ao",
    "denoising",
    "volume_direct",
    "volume_indirect",
];

/// The Blender schema with its factory defaults
pub fn schema() -> Result<Schema, SettingsError> {
    Schema::new(vec![
        SchemaNode::group(
            "unit_scale_settings",
            vec![
                SchemaNode::boolean("enabled", true),
                SchemaNode::boolean("apply_on_opening", false),
                SchemaNode::float("base_file_unit_scale", 0.01),
            ],
        ),
        SchemaNode::boolean("set_resolution_startup", true),
        SchemaNode::boolean("set_frames_startup", true),
        imageio(),
        render_settings(),
        workfile_builder(),
        publish(),
    ])
}

fn imageio() -> SchemaNode {
    SchemaNode::group(
        "imageio",
        vec![
            SchemaNode::boolean("activate_host_color_management", true),
            SchemaNode::group(
                "ocio_config",
                vec![
                    SchemaNode::boolean("override_global_config", false),
                    SchemaNode::scalar_list("filepath", Kind::String, vec![]),
                ],
            ),
            SchemaNode::group(
                "file_rules",
                vec![
                    SchemaNode::boolean("activate_host_rules", false),
                    SchemaNode::mapping(
                        "rules",
                        SchemaNode::group(
                            "rule",
                            vec![
                                SchemaNode::string("pattern", ""),
                                SchemaNode::string("colorspace", ""),
                                SchemaNode::string("ext", ""),
                            ],
                        ),
                        vec![],
                    ),
                ],
            ),
        ],
    )
}

fn render_settings() -> SchemaNode {
    SchemaNode::group(
        "RenderSettings",
        vec![
            SchemaNode::string("default_render_image_folder", "renders/blender"),
            SchemaNode::enumeration("aov_separator", &["dash", "underscore", "dot"], "underscore"),
            SchemaNode::enumeration(
                "image_format",
                &["exr", "bmp", "rgb", "png", "jpeg", "jp2", "tga", "tif"],
                "exr",
            ),
            SchemaNode::boolean("multilayer_exr", true),
            SchemaNode::scalar_list(
                "aov_list",
                Kind::Enum(AOV_NAMES.iter().map(|s| s.to_string()).collect()),
                vec![],
            ),
            SchemaNode::record_list(
                "custom_passes",
                vec![
                    SchemaNode::string("attribute", ""),
                    SchemaNode::enumeration("value", &["COLOR", "VALUE"], "COLOR"),
                ],
                vec![],
            ),
        ],
    )
}

fn workfile_builder() -> SchemaNode {
    SchemaNode::group(
        "workfile_builder",
        vec![
            SchemaNode::boolean("create_first_version", false),
            SchemaNode::record_list(
                "custom_templates",
                vec![
                    SchemaNode::scalar_list("task_types", Kind::String, vec![]),
                    SchemaNode::group(
                        "path",
                        vec![
                            SchemaNode::string("windows", ""),
                            SchemaNode::string("darwin", ""),
                            SchemaNode::string("linux", ""),
                        ],
                    ),
                ],
                vec![],
            ),
        ],
    )
}

/// A publish plugin: the control triple followed by plugin-specific keys
fn plugin(name: &str, optional: bool, active: bool, extra: Vec<SchemaNode>) -> SchemaNode {
    let mut children = vec![
        SchemaNode::boolean("enabled", true),
        SchemaNode::boolean("optional", optional),
        SchemaNode::boolean("active", active),
    ];
    children.extend(extra);
    SchemaNode::group(name, children)
}

fn families(name: &str, values: &[&str]) -> SchemaNode {
    SchemaNode::scalar_list(name, Kind::String, values.iter().map(|v| json!(v)).collect())
}

fn publish() -> SchemaNode {
    SchemaNode::group(
        PUBLISH,
        vec![
            plugin("ValidateCameraZeroKeyframe", true, true, vec![]),
            plugin(
                "ValidateFileSaved",
                false,
                true,
                vec![families("exclude_families", &[])],
            ),
            plugin("ValidateRenderCameraIsSet", false, true, vec![]),
            plugin("ValidateDeadlinePublish", false, true, vec![]),
            plugin("ValidateMeshHasUvs", true, true, vec![]),
            plugin("ValidateMeshNoNegativeScale", false, true, vec![]),
            plugin("ValidateTransformZero", false, true, vec![]),
            plugin("ValidateNoColonsInName", false, true, vec![]),
            plugin("ValidateInstanceEmpty", false, true, vec![]),
            plugin(
                "ExtractBlend",
                true,
                true,
                vec![families(
                    "families",
                    &["model", "camera", "rig", "action", "layout", "blendScene"],
                )],
            ),
            plugin("ExtractFBX", true, false, vec![]),
            plugin("ExtractModelABC", true, false, vec![]),
            plugin("ExtractBlendAnimation", true, true, vec![]),
            plugin("ExtractAnimationFBX", true, false, vec![]),
            plugin("ExtractCamera", true, true, vec![]),
            plugin("ExtractCameraABC", true, true, vec![]),
            plugin("ExtractLayout", true, false, vec![]),
            plugin("ExtractThumbnail", true, true, vec![thumbnail_presets()]),
            plugin("ExtractPlayblast", true, true, vec![playblast_presets()]),
        ],
    )
}

fn overlay_flags() -> SchemaNode {
    const FLAGS: &[&str] = &[
        "show_overlays",
        "show_ortho_grid",
        "show_floor",
        "show_axis_x",
        "show_axis_y",
        "show_axis_z",
        "show_text",
        "show_stats",
        "show_cursor",
        "show_annotation",
        "show_extras",
        "show_relationship_lines",
        "show_outline_selected",
        "show_motion_paths",
        "show_object_origins",
        "show_bones",
    ];
    SchemaNode::group(
        "overlay",
        FLAGS.iter().map(|f| SchemaNode::boolean(f, false)).collect(),
    )
}

fn thumbnail_presets() -> SchemaNode {
    let template = SchemaNode::group(
        "preset",
        vec![
            SchemaNode::group(
                "image_settings",
                vec![
                    SchemaNode::enumeration("file_format", &["JPEG", "PNG"], "JPEG"),
                    SchemaNode::enumeration("color_mode", &["BW", "RGB", "RGBA"], "RGB"),
                    SchemaNode::integer("quality", 100),
                ],
            ),
            SchemaNode::group(
                "display_options",
                vec![
                    SchemaNode::group(
                        "shading",
                        vec![
                            SchemaNode::enumeration("light", &["STUDIO", "MATCAP", "FLAT"], "STUDIO"),
                            SchemaNode::string("studio_light", "Default"),
                            SchemaNode::enumeration(
                                "type",
                                &["WIREFRAME", "SOLID", "MATERIAL", "RENDERED"],
                                "SOLID",
                            ),
                            SchemaNode::enumeration(
                                "color_type",
                                &["MATERIAL", "OBJECT", "RANDOM", "SINGLE", "TEXTURE", "VERTEX"],
                                "OBJECT",
                            ),
                            SchemaNode::boolean("show_xray", false),
                            SchemaNode::boolean("show_shadows", false),
                            SchemaNode::boolean("show_cavity", true),
                        ],
                    ),
                    overlay_flags(),
                ],
            ),
        ],
    );

    SchemaNode::mapping(
        "presets",
        template,
        vec![
            ("model", json!({})),
            (
                "rig",
                json!({
                    "display_options": {
                        "shading": {"show_xray": true, "show_cavity": false},
                        "overlay": {"show_overlays": true, "show_bones": true}
                    }
                }),
            ),
        ],
    )
}

fn playblast_presets() -> SchemaNode {
    let template = SchemaNode::group(
        "preset",
        vec![
            SchemaNode::group(
                "image_settings",
                vec![
                    SchemaNode::enumeration("file_format", &["PNG", "JPEG"], "PNG"),
                    SchemaNode::enumeration("color_mode", &["BW", "RGB", "RGBA"], "RGB"),
                    SchemaNode::enumeration("color_depth", &["8", "16"], "8"),
                    SchemaNode::integer("compression", 15),
                ],
            ),
            SchemaNode::group(
                "display_options",
                vec![
                    SchemaNode::group(
                        "shading",
                        vec![
                            SchemaNode::enumeration(
                                "type",
                                &["WIREFRAME", "SOLID", "MATERIAL", "RENDERED"],
                                "MATERIAL",
                            ),
                            SchemaNode::enumeration(
                                "render_pass",
                                &["COMBINED", "EMISSION", "ENVIRONMENT", "AO", "SHADOW"],
                                "COMBINED",
                            ),
                        ],
                    ),
                    SchemaNode::group(
                        "overlay",
                        vec![SchemaNode::boolean("show_overlays", false)],
                    ),
                ],
            ),
        ],
    );

    SchemaNode::mapping("presets", template, vec![("default", json!({}))])
}

/// Names of the publish plugins in declaration order
pub fn plugin_names(schema: &Schema) -> Vec<String> {
    schema
        .children_of(PUBLISH)
        .map(|children| children.iter().map(|c| c.name.clone()).collect())
        .unwrap_or_default()
}
