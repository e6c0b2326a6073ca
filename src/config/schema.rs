use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreesmithError};
use crate::front_matter::FrontMatterFormat;
use crate::handler::{HandlerDescriptor, HandlerRegistry, DEFAULT_SUFFIX};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub build: BuildConfig,

    /// Registered in order; later entries override earlier ones.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_templates")]
    pub templates: PathBuf,

    #[serde(default = "default_template_suffix")]
    pub template_suffix: String,
}

fn default_input() -> PathBuf {
    PathBuf::from("content")
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

fn default_template_suffix() -> String {
    ".tera".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            templates: default_templates(),
            template_suffix: default_template_suffix(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    pub name: Option<String>,

    /// Shell globs matched against the slash-separated input path.
    pub patterns: Vec<String>,

    /// Replaces the input extension; `""` strips it.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    pub template: Option<String>,

    pub renderer: Option<String>,

    #[serde(default)]
    pub front_matter: FrontMatterFormat,

    #[serde(default)]
    pub require_front_matter: bool,

    /// If false, matched files are indexed for queries but not written.
    #[serde(default = "default_true")]
    pub output: bool,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl HandlerConfig {
    fn to_descriptor(&self, index: usize) -> Result<HandlerDescriptor> {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("handler-{index}"));
        let mut descriptor = HandlerDescriptor::glob(name, &self.patterns)?
            .with_suffix(self.suffix.clone())
            .with_front_matter(self.front_matter);
        if let Some(template) = &self.template {
            descriptor = descriptor.with_template(template.clone());
        }
        if let Some(renderer) = &self.renderer {
            descriptor = descriptor.with_renderer(renderer.clone());
        }
        if self.require_front_matter {
            descriptor = descriptor.requiring_front_matter();
        }
        if !self.output {
            descriptor = descriptor.without_output();
        }
        Ok(descriptor)
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        for (index, handler) in self.handlers.iter().enumerate() {
            if handler.patterns.is_empty() {
                return Err(TreesmithError::InvalidHandler {
                    index,
                    reason: "'patterns' must list at least one glob".into(),
                });
            }
            if handler.require_front_matter && handler.front_matter == FrontMatterFormat::None {
                return Err(TreesmithError::InvalidHandler {
                    index,
                    reason: "'require_front_matter' needs a front_matter format other than none"
                        .into(),
                });
            }
        }
        Ok(())
    }

    /// Build the handler registry, falling back to a single markdown handler
    /// when none are configured.
    pub fn handler_registry(&self) -> Result<HandlerRegistry> {
        if self.handlers.is_empty() {
            return Ok(default_handlers());
        }
        let mut registry = HandlerRegistry::new();
        for (index, handler) in self.handlers.iter().enumerate() {
            registry.add(handler.to_descriptor(index)?);
        }
        Ok(registry)
    }

    /// Make relative build paths relative to `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.build.input,
            &mut self.build.output,
            &mut self.build.templates,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

pub fn default_handlers() -> HandlerRegistry {
    HandlerRegistry::new().with(
        HandlerDescriptor::predicate("markdown", |p| p.ends_with(".md")).with_renderer("markdown"),
    )
}
