//! Strata: Hierarchical Settings Resolution
//!
//! Resolves a fully-populated settings tree for a studio, project or task
//! context by layering sparse override documents over schema-validated
//! defaults. The resolved tree feeds host integrations directly, through
//! the plugin control view and through named presets.
//!
//! ```no_run
//! use strata::{plugins, select, ResolutionContext, Resolver};
//!
//! let resolver = Resolver::blender(true)?;
//! let tree = resolver.resolve(&ResolutionContext::project("alpha"));
//! let thumbnail = strata::plugin(&tree, "ExtractThumbnail")?;
//! let preset = select(&thumbnail, "rig")?;
//! # let _ = (plugins(&tree)?, preset);
//! # Ok::<(), strata::SettingsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod defaults;
pub mod digest;
pub mod error;
pub mod layers;
pub mod logging;
pub mod publish;
pub mod resolver;
pub mod schema;
pub mod sections;

pub use defaults::DefaultsStore;
pub use error::{ConfigError, SettingsError, SourceError};
pub use layers::scope::{ResolutionContext, Scope};
pub use layers::source::{DocumentSource, FileDocumentSource, MemoryDocumentSource};
pub use layers::{LayerStack, SyncReport};
pub use publish::{plugin, plugins, select, PluginControl, Preset, PresetMatch};
pub use resolver::tree::{ResolvedTree, Section};
pub use resolver::{Resolver, ValueOrigin};
pub use schema::{Kind, Schema, SchemaNode};
