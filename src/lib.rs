pub mod check;
pub mod config;
pub mod error;
pub mod front_matter;
pub mod handler;
pub mod render;
pub mod renderers;

use std::path::PathBuf;

use console::style;

use crate::config::{discover_config, SiteConfig};
use crate::error::{Result, TreesmithError};
use crate::render::{
    execute_plan, render_collection, BuildPlan, BuiltSite, TemplateSet, TreeWalker,
};
use crate::renderers::RendererRegistry;

pub struct BuildOptions {
    /// Path to treesmith.toml. If None, looks in the current directory.
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub templates: Option<PathBuf>,
}

/// A build that has been collected and rendered but not yet written.
pub struct FullBuildPlan {
    pub render_plan: BuildPlan,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Load the site config and apply command-line overrides.
pub fn resolve_config(options: &BuildOptions) -> Result<SiteConfig> {
    let cwd = std::env::current_dir().map_err(|e| TreesmithError::Io {
        context: "getting current directory".into(),
        source: e,
    })?;
    let mut config = discover_config(options.config.as_deref(), &cwd)?;

    if let Some(input) = &options.input {
        config.build.input = input.clone();
    }
    if let Some(output) = &options.output {
        config.build.output = output.clone();
    }
    if let Some(templates) = &options.templates {
        config.build.templates = templates.clone();
    }

    Ok(config)
}

/// Plan a build: collect every document, then render them all in memory.
///
/// Nothing is written to the output directory.
pub fn plan_build(options: &BuildOptions, renderers: &RendererRegistry) -> Result<FullBuildPlan> {
    let config = resolve_config(options)?;
    let handlers = config.handler_registry()?;

    let templates_dir = &config.build.templates;
    if !templates_dir.is_dir() && handlers.iter().any(|h| h.template.is_some()) {
        eprintln!(
            "{} template directory {} not found",
            style("warning:").yellow().bold(),
            style(templates_dir.display()).yellow()
        );
    }
    let mut templates = TemplateSet::load(templates_dir, &config.build.template_suffix)?;

    let collection = TreeWalker::new(&handlers, renderers)
        .exclude(&config.build.output)
        .walk(&config.build.input)?;
    let render_plan = render_collection(collection, &mut templates)?;

    Ok(FullBuildPlan {
        render_plan,
        input_dir: config.build.input,
        output_dir: config.build.output,
    })
}

/// Write a planned build to its output directory.
pub fn execute_build(plan: &FullBuildPlan) -> Result<BuiltSite> {
    let result = execute_plan(&plan.render_plan, &plan.output_dir)?;

    println!(
        "\n{} Site built at {}",
        style("✓").green().bold(),
        style(result.output_dir.display()).cyan()
    );
    println!(
        "  {} documents rendered, {} files copied",
        result.files_rendered.len(),
        result.files_copied.len()
    );

    Ok(result)
}

/// Build a site with the built-in renderers.
pub fn build(options: &BuildOptions) -> Result<BuiltSite> {
    let plan = plan_build(options, &RendererRegistry::with_defaults())?;
    execute_build(&plan)
}
