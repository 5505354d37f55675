//! Publish pipeline views.
//!
//! The publish pipeline reads two things out of a resolved tree: the control
//! triple of every plugin (`enabled`, `optional`, `active`) and, for plugins
//! that carry them, a named preset chosen at publish time.

pub mod plugins;
pub mod presets;

pub use plugins::{plugin, plugins, plugins_in, PluginControl};
pub use presets::{select, Preset, PresetMatch, DEFAULT_PRESET};
