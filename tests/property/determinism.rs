//! Resolution is a pure function of defaults and layers

use proptest::prelude::*;
use serde_json::{json, Value};
use strata::digest::document_digest;
use strata::{ResolutionContext, Resolver};

const SEPARATORS: [&str; 3] = ["dash", "underscore", "dot"];
const FORMATS: [&str; 4] = ["exr", "png", "tif", "jpeg"];

fn render_override() -> impl Strategy<Value = Value> {
    (
        prop::option::of(0..SEPARATORS.len()),
        prop::option::of(0..FORMATS.len()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(separator, format, multilayer)| {
            let mut render = serde_json::Map::new();
            if let Some(i) = separator {
                render.insert("aov_separator".into(), json!(SEPARATORS[i]));
            }
            if let Some(i) = format {
                render.insert("image_format".into(), json!(FORMATS[i]));
            }
            if let Some(b) = multilayer {
                render.insert("multilayer_exr".into(), json!(b));
            }
            json!({"RenderSettings": render})
        })
}

/// Resolving twice, or on a fresh resolver, yields the same tree
#[test]
fn test_resolution_idempotent_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(render_override(), render_override()),
            |(studio, project)| {
                let build = || {
                    let resolver = Resolver::blender(false).unwrap();
                    resolver.layers().push("studio", studio.clone()).unwrap();
                    resolver.layers().push("project:alpha", project.clone()).unwrap();
                    resolver
                };
                let context = ResolutionContext::project("alpha");
                let resolver = build();
                let first = resolver.resolve(&context);
                let second = resolver.resolve(&context);
                let fresh = build().resolve(&context);

                prop_assert_eq!(first.value(), second.value());
                prop_assert_eq!(first.value(), fresh.value());
                prop_assert_eq!(first.digest(), fresh.digest());
                Ok(())
            },
        )
        .unwrap();
}

/// Document digests ignore key insertion order
#[test]
fn test_digest_key_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..12),
            |entries| {
                let forward: serde_json::Map<String, Value> =
                    entries.iter().map(|(k, v)| (k.clone(), json!(v))).collect();
                let backward: serde_json::Map<String, Value> = entries
                    .iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), json!(v)))
                    .collect();
                prop_assert_eq!(
                    document_digest(&Value::Object(forward)),
                    document_digest(&Value::Object(backward))
                );
                Ok(())
            },
        )
        .unwrap();
}
