//! End-to-end resolution over the Blender schema

use serde_json::json;
use strata::{ResolutionContext, Scope, SettingsError, ValueOrigin};

use crate::integration::blender_resolver;

#[test]
fn test_zero_layers_resolves_to_defaults() {
    let resolver = blender_resolver();
    for context in [
        ResolutionContext::studio(),
        ResolutionContext::project("alpha"),
        ResolutionContext::task("alpha", "lookdev"),
    ] {
        let tree = resolver.resolve(&context);
        assert_eq!(tree.value(), resolver.defaults().document());
    }
}

#[test]
fn test_every_leaf_path_resolves() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::task("alpha", "anim"));
    for leaf in resolver.schema().leaf_paths() {
        assert!(tree.get(&leaf).is_ok(), "missing {}", leaf);
    }
}

#[test]
fn test_project_override_keeps_sibling_defaults() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push(
            "project:alpha",
            json!({"RenderSettings": {"image_format": "png"}}),
        )
        .unwrap();

    let tree = resolver.resolve(&ResolutionContext::project("alpha"));
    assert_eq!(tree.str_at("RenderSettings.aov_separator").unwrap(), "underscore");
    assert_eq!(tree.str_at("RenderSettings.image_format").unwrap(), "png");
    assert!(tree.bool_at("RenderSettings.multilayer_exr").unwrap());
}

#[test]
fn test_task_beats_project_beats_studio() {
    let resolver = blender_resolver();
    let layers = resolver.layers();
    layers
        .push("studio", json!({"unit_scale_settings": {"base_file_unit_scale": 1.0}}))
        .unwrap();
    layers
        .push(
            "project:alpha",
            json!({"unit_scale_settings": {"base_file_unit_scale": 0.1, "apply_on_opening": true}}),
        )
        .unwrap();
    layers
        .push(
            "task:alpha/layout",
            json!({"unit_scale_settings": {"base_file_unit_scale": 0.5}}),
        )
        .unwrap();

    let task = resolver.resolve(&ResolutionContext::task("alpha", "layout"));
    assert_eq!(task.float_at("unit_scale_settings.base_file_unit_scale").unwrap(), 0.5);
    assert!(task.bool_at("unit_scale_settings.apply_on_opening").unwrap());
    assert_eq!(
        task.layers(),
        &[
            Scope::Studio,
            Scope::Project("alpha".into()),
            Scope::Task {
                project: "alpha".into(),
                task: "layout".into()
            }
        ]
    );

    let other_task = resolver.resolve(&ResolutionContext::task("alpha", "anim"));
    assert_eq!(
        other_task.float_at("unit_scale_settings.base_file_unit_scale").unwrap(),
        0.1
    );

    let studio = resolver.resolve(&ResolutionContext::studio());
    assert_eq!(studio.float_at("unit_scale_settings.base_file_unit_scale").unwrap(), 1.0);
    assert!(!studio.bool_at("unit_scale_settings.apply_on_opening").unwrap());
}

#[test]
fn test_lists_replace_wholesale() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push("studio", json!({"RenderSettings": {"aov_list": ["z", "mist"]}}))
        .unwrap();
    resolver
        .layers()
        .push("project:alpha", json!({"RenderSettings": {"aov_list": ["empty"]}}))
        .unwrap();

    let tree = resolver.resolve(&ResolutionContext::project("alpha"));
    assert_eq!(tree.list_at("RenderSettings.aov_list").unwrap(), &[json!("empty")]);
    let studio = resolver.resolve(&ResolutionContext::studio());
    assert_eq!(
        studio.list_at("RenderSettings.aov_list").unwrap(),
        &[json!("z"), json!("mist")]
    );
}

#[test]
fn test_new_preset_entry_materialises_from_template() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push(
            "project:alpha",
            json!({"publish": {"ExtractThumbnail": {"presets": {
                "lookdev": {"display_options": {"shading": {"type": "MATERIAL"}}}
            }}}}),
        )
        .unwrap();

    let tree = resolver.resolve(&ResolutionContext::project("alpha"));
    let base = "publish.ExtractThumbnail.presets.lookdev";
    assert_eq!(
        tree.str_at(&format!("{}.display_options.shading.type", base)).unwrap(),
        "MATERIAL"
    );
    assert_eq!(
        tree.str_at(&format!("{}.display_options.shading.light", base)).unwrap(),
        "STUDIO"
    );
    assert_eq!(
        tree.int_at(&format!("{}.image_settings.quality", base)).unwrap(),
        100
    );
    assert_eq!(
        tree.str_at("publish.ExtractThumbnail.presets.model.image_settings.file_format")
            .unwrap(),
        "JPEG"
    );
}

#[test]
fn test_explain_reports_winning_layer() {
    let resolver = blender_resolver();
    resolver
        .layers()
        .push("studio", json!({"RenderSettings": {"aov_list": ["z"]}}))
        .unwrap();
    resolver
        .layers()
        .push("task:alpha/fx", json!({"RenderSettings": {"image_format": "tif"}}))
        .unwrap();

    let context = ResolutionContext::task("alpha", "fx");
    assert_eq!(
        resolver.explain(&context, "RenderSettings.image_format").unwrap(),
        ValueOrigin::Layer(Scope::Task {
            project: "alpha".into(),
            task: "fx".into()
        })
    );
    assert_eq!(
        resolver.explain(&context, "RenderSettings.aov_list").unwrap(),
        ValueOrigin::Layer(Scope::Studio)
    );
    assert_eq!(
        resolver.explain(&context, "set_frames_startup").unwrap(),
        ValueOrigin::Defaults
    );
}

#[test]
fn test_unknown_path_is_reported() {
    let resolver = blender_resolver();
    let tree = resolver.resolve(&ResolutionContext::studio());
    assert_eq!(
        tree.get("RenderSettings.denoiser").unwrap_err(),
        SettingsError::UnknownPath {
            path: "RenderSettings.denoiser".into()
        }
    );
    assert!(matches!(
        resolver.schema().describe("RenderSettings.denoiser"),
        Err(SettingsError::UnknownPath { .. })
    ));
}

#[test]
fn test_resolve_is_deterministic_across_resolvers() {
    let build = || {
        let resolver = blender_resolver();
        resolver
            .layers()
            .push("studio", json!({"set_resolution_startup": false}))
            .unwrap();
        resolver
            .layers()
            .push("project:alpha", json!({"RenderSettings": {"image_format": "png"}}))
            .unwrap();
        resolver
    };
    let a = build().resolve(&ResolutionContext::project("alpha"));
    let b = build().resolve(&ResolutionContext::project("alpha"));
    assert_eq!(*a, *b);
    assert_eq!(a.digest(), b.digest());
}
