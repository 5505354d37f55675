//! CLI output: plain-text rendering of command results.

use crate::publish::PluginControl;
use crate::schema::{Kind, SchemaNode};
use comfy_table::Table;

/// Render an error chain on one line
pub fn map_error(e: &anyhow::Error) -> String {
    format!("Error: {:#}", e)
}

/// Plugin listing as a table
pub fn format_plugins_table(controls: &[PluginControl]) -> String {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Plugin", "Enabled", "Optional", "Active", "Presets"]);
    for control in controls {
        let presets = control
            .presets()
            .map(|p| p.keys().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        table.add_row(vec![
            control.name.clone(),
            yes_no(control.enabled),
            yes_no(control.optional),
            yes_no(control.active),
            presets,
        ]);
    }
    table.to_string()
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

/// One schema node: its kind, default and declared children
pub fn format_describe(at: &str, node: &SchemaNode) -> String {
    let label = if at.is_empty() { "(root)" } else { at };
    let mut out = format!("{}: {}\n", label, node.kind);

    match node.kind {
        Kind::Group => {}
        Kind::Mapping => {
            if let Some(entry) = &node.entry {
                out.push_str(&format!("  entry: {}\n", entry.kind));
                append_children(&mut out, &entry.children);
            }
        }
        _ => out.push_str(&format!("  default: {}\n", node.default_value)),
    }
    append_children(&mut out, &node.children);
    out.trim_end().to_string()
}

fn append_children(out: &mut String, children: &[SchemaNode]) {
    for child in children {
        out.push_str(&format!("  {}: {}\n", child.name, child.kind));
    }
}
