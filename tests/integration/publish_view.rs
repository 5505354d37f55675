//! Plugin control view and preset selection over resolved trees

use serde_json::json;
use strata::publish::plugins_in;
use strata::{plugin, plugins, select, PresetMatch, ResolutionContext, SettingsError};

use crate::integration::blender_resolver;

#[test]
fn test_plugin_controls_in_declaration_order() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::studio());
    let names: Vec<String> = plugins(&tree).unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, strata::schema::blender::plugin_names(resolver.schema()));
    assert_eq!(plugins_in(&tree, "publish").unwrap().len(), names.len());
}

#[test]
fn test_task_layer_disables_plugin() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push(
            "task:alpha/anim",
            json!({"publish": {"ValidateMeshHasUvs": {"active": false}}}),
        )
        .unwrap();

    let task_tree = resolver.resolve(&ResolutionContext::task("alpha", "anim"));
    let uvs = plugin(&task_tree, "ValidateMeshHasUvs").unwrap();
    assert!(!uvs.active);

    let project_tree = resolver.resolve(&ResolutionContext::project("alpha"));
    assert!(plugin(&project_tree, "ValidateMeshHasUvs").unwrap().active);
}

#[test]
fn test_extra_keys_pass_through() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push(
            "studio",
            json!({"publish": {"ExtractBlend": {"families": ["model", "rig"]}}}),
        )
        .unwrap();
    let tree = resolver.resolve(&ResolutionContext::studio());
    let blend = plugin(&tree, "ExtractBlend").unwrap();
    assert_eq!(blend.extra["families"], json!(["model", "rig"]));
}

#[test]
fn test_thumbnail_preset_selection() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::project("alpha"));
    let thumbnail = plugin(&tree, "ExtractThumbnail").unwrap();

    let rig = select(&thumbnail, "rig").unwrap();
    assert_eq!(rig.matched, PresetMatch::Exact);
    assert_eq!(rig.settings["display_options"]["shading"]["show_xray"], json!(true));

    let err = select(&thumbnail, "animation").unwrap_err();
    assert_eq!(
        err,
        SettingsError::NoMatchingPreset {
            plugin: "ExtractThumbnail".into(),
            key: "animation".into(),
            available: vec!["model".into(), "rig".into()],
        }
    );
}

#[test]
fn test_playblast_falls_back_to_default() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::studio());
    let playblast = plugin(&tree, "ExtractPlayblast").unwrap();

    let preset = select(&playblast, "layout").unwrap();
    assert_eq!(preset.name, "default");
    assert_eq!(preset.matched, PresetMatch::Default);
    assert_eq!(preset.settings["image_settings"]["compression"], json!(15));
}

#[test]
fn test_overridden_default_preset_is_selected() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push(
            "project:alpha",
            json!({"publish": {"ExtractPlayblast": {"presets": {
                "default": {"image_settings": {"color_depth": "16"}}
            }}}}),
        )
        .unwrap();

    let tree = resolver.resolve(&ResolutionContext::project("alpha"));
    let preset = select(&plugin(&tree, "ExtractPlayblast").unwrap(), "anything").unwrap();
    assert_eq!(preset.settings["image_settings"]["color_depth"], json!("16"));
    assert_eq!(preset.settings["image_settings"]["file_format"], json!("PNG"));
}

#[test]
fn test_plugin_without_presets_cannot_select() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::studio());
    let fbx = plugin(&tree, "ExtractFBX").unwrap();
    assert!(fbx.presets().is_none());
    assert!(matches!(
        select(&fbx, "default"),
        Err(SettingsError::NoMatchingPreset { .. })
    ));
}
