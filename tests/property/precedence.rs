//! Narrower layers win, and untouched paths keep their defaults

use proptest::prelude::*;
use serde_json::json;
use strata::{ResolutionContext, Resolver};

fn scale() -> impl Strategy<Value = f64> {
    (1u32..10_000).prop_map(|n| f64::from(n) / 1000.0)
}

#[test]
fn test_highest_layer_setting_a_path_wins_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::option::of(scale()),
                prop::option::of(scale()),
                prop::option::of(scale()),
            ),
            |(studio, project, task)| {
                let resolver = Resolver::blender(true).unwrap();
                let layers = [
                    ("studio", studio),
                    ("project:alpha", project),
                    ("task:alpha/layout", task),
                ];
                for (name, value) in layers {
                    if let Some(v) = value {
                        resolver
                            .layers()
                            .push(
                                name,
                                json!({"unit_scale_settings": {"base_file_unit_scale": v}}),
                            )
                            .unwrap();
                    }
                }

                let tree = resolver.resolve(&ResolutionContext::task("alpha", "layout"));
                let expected = task.or(project).or(studio).unwrap_or(0.01);
                prop_assert_eq!(
                    tree.float_at("unit_scale_settings.base_file_unit_scale").unwrap(),
                    expected
                );
                prop_assert!(tree.bool_at("unit_scale_settings.enabled").unwrap());
                prop_assert_eq!(
                    tree.str_at("RenderSettings.aov_separator").unwrap(),
                    "underscore"
                );
                Ok(())
            },
        )
        .unwrap();
}

const AOVS: [&str; 5] = ["z", "mist", "normal", "ao", "shadow"];

fn aovs(indices: &[usize]) -> Vec<&'static str> {
    indices.iter().map(|&i| AOVS[i]).collect()
}

/// Scalar lists from a higher layer replace, never concatenate
#[test]
fn test_list_replacement_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(0..AOVS.len(), 0..5),
                prop::collection::vec(0..AOVS.len(), 0..5),
            ),
            |(lower, upper)| {
                let resolver = Resolver::blender(true).unwrap();
                resolver
                    .layers()
                    .push("studio", json!({"RenderSettings": {"aov_list": aovs(&lower)}}))
                    .unwrap();
                resolver
                    .layers()
                    .push(
                        "project:alpha",
                        json!({"RenderSettings": {"aov_list": aovs(&upper)}}),
                    )
                    .unwrap();

                let tree = resolver.resolve(&ResolutionContext::project("alpha"));
                let expected: Vec<serde_json::Value> =
                    aovs(&upper).into_iter().map(|s| json!(s)).collect();
                prop_assert_eq!(
                    tree.list_at("RenderSettings.aov_list").unwrap(),
                    expected.as_slice()
                );
                Ok(())
            },
        )
        .unwrap();
}
