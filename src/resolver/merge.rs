//! Schema-directed merge of override documents onto an accumulator.
//!
//! Merge semantics by kind:
//! - Scalars and enums: override replaces
//! - Lists (scalar or record): override REPLACES the whole list
//! - Mappings: key by key; shared keys recurse, new keys are inserted
//! - Groups: recurse per declared child
//!
//! Documents are validated before they reach this module, so keys the
//! schema does not declare are never present.

use crate::schema::{Kind, SchemaNode};
use serde_json::Value;

/// Apply `overlay` onto `acc`, both located at `node`.
pub fn apply_overlay(node: &SchemaNode, acc: &mut Value, overlay: &Value) {
    match node.kind {
        Kind::Group => {
            let (Some(acc_map), Some(overlay_map)) = (acc.as_object_mut(), overlay.as_object())
            else {
                *acc = overlay.clone();
                return;
            };
            for child in &node.children {
                if let Some(child_overlay) = overlay_map.get(&child.name) {
                    match acc_map.get_mut(&child.name) {
                        Some(child_acc) => apply_overlay(child, child_acc, child_overlay),
                        None => {
                            let mut fresh = child.default_value.clone();
                            apply_overlay(child, &mut fresh, child_overlay);
                            acc_map.insert(child.name.clone(), fresh);
                        }
                    }
                }
            }
        }
        Kind::Mapping => {
            let Some(entry) = node.entry.as_deref() else {
                let base = std::mem::take(acc);
                *acc = deep_merge(base, overlay.clone());
                return;
            };
            let (Some(acc_map), Some(overlay_map)) = (acc.as_object_mut(), overlay.as_object())
            else {
                *acc = overlay.clone();
                return;
            };
            for (key, entry_overlay) in overlay_map {
                match acc_map.get_mut(key) {
                    Some(existing) => apply_overlay(entry, existing, entry_overlay),
                    None => {
                        // New keys start from the template so the entry is complete.
                        let mut fresh = entry.default_value.clone();
                        apply_overlay(entry, &mut fresh, entry_overlay);
                        acc_map.insert(key.clone(), fresh);
                    }
                }
            }
        }
        // Scalars and lists: last wins, no concatenation
        _ => *acc = overlay.clone(),
    }
}

/// Deep merge two free-form JSON values.
///
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: second wins
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}
