//! CLI route: single route table and run context.

use crate::cli::output::{format_describe, format_plugins_table};
use crate::cli::parse::{Commands, ContextArgs, OutputFormat};
use crate::config::ConfigLoader;
use crate::layers::scope::ResolutionContext;
use crate::layers::source::{read_document_file, FileDocumentSource};
use crate::publish::{plugin, plugins, select};
use crate::resolver::Resolver;
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runtime context for one CLI invocation
pub struct RunContext {
    resolver: Resolver,
}

impl RunContext {
    /// Load configuration, build the resolver and sync the override directory.
    ///
    /// A document in the directory that fails validation aborts the run.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        overrides: Option<PathBuf>,
    ) -> Result<Self> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        let overrides_root = overrides.unwrap_or_else(|| config.overrides_root(&workspace_root));

        let resolver = Resolver::blender(config.cache.enabled)?;
        let report = resolver
            .layers()
            .sync(&FileDocumentSource::new(&overrides_root))
            .with_context(|| format!("reading overrides from {}", overrides_root.display()))?;
        if let Some((scope, error)) = report.rejected.first() {
            warn!(rejected = report.rejected.len(), "Override documents rejected");
            bail!("override layer {} rejected: {}", scope, error);
        }
        info!(
            overrides = %overrides_root.display(),
            layers = resolver.layers().snapshot().len(),
            "Run context ready"
        );

        Ok(Self { resolver })
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Resolve { context, path } => self.handle_resolve(context, path.as_deref()),
            Commands::Plugins { context, format } => self.handle_plugins(context, *format),
            Commands::Preset {
                context,
                plugin,
                key,
            } => self.handle_preset(context, plugin, key),
            Commands::Describe { path } => self.handle_describe(path.as_deref().unwrap_or("")),
            Commands::Check { file } => self.handle_check(file),
            Commands::Explain { context, path } => self.handle_explain(context, path),
        }
    }

    fn context(args: &ContextArgs) -> Result<ResolutionContext> {
        Ok(ResolutionContext::from_parts(
            args.project.clone(),
            args.task.clone(),
        )?)
    }

    fn handle_resolve(&self, args: &ContextArgs, at: Option<&str>) -> Result<String> {
        let tree = self.resolver.resolve(&Self::context(args)?);
        debug!(context = %tree.context(), digest = %tree.digest_hex(), "Resolved");
        match at {
            Some(at) => Ok(serde_json::to_string_pretty(tree.get(at)?)?),
            None => Ok(tree.to_json_pretty()?),
        }
    }

    fn handle_plugins(&self, args: &ContextArgs, format: OutputFormat) -> Result<String> {
        let tree = self.resolver.resolve(&Self::context(args)?);
        let controls = plugins(&tree)?;
        match format {
            OutputFormat::Text => Ok(format_plugins_table(&controls)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&controls)?),
        }
    }

    fn handle_preset(&self, args: &ContextArgs, name: &str, key: &str) -> Result<String> {
        let tree = self.resolver.resolve(&Self::context(args)?);
        let preset = select(&plugin(&tree, name)?, key)?;
        Ok(serde_json::to_string_pretty(&preset)?)
    }

    fn handle_describe(&self, at: &str) -> Result<String> {
        let node = self.resolver.schema().describe(at)?;
        Ok(format_describe(at, node))
    }

    fn handle_check(&self, file: &Path) -> Result<String> {
        let document = read_document_file(file)?;
        if !document.is_object() {
            bail!("{} must contain a settings object", file.display());
        }
        self.resolver
            .schema()
            .validate_override(&document)
            .with_context(|| format!("{} is not a valid override document", file.display()))?;
        Ok(format!("OK: {}", file.display()))
    }

    fn handle_explain(&self, args: &ContextArgs, at: &str) -> Result<String> {
        let context = Self::context(args)?;
        let origin = self.resolver.explain(&context, at)?;
        let tree = self.resolver.resolve(&context);
        Ok(format!("{} = {} (from {})", at, tree.get(at)?, origin))
    }
}
