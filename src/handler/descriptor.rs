use std::fmt;
use std::path::Path;
use std::sync::Arc;

use globset::GlobSet;

use crate::error::Result;
use crate::front_matter::FrontMatterFormat;
use crate::handler::build_glob_set;

pub const DEFAULT_SUFFIX: &str = ".html";

/// Decides whether a handler claims a slash-separated input path.
#[derive(Clone)]
pub enum Matcher {
    /// Shell globs matched against the whole relative path; `*` crosses `/`.
    Glob { patterns: Vec<String>, set: GlobSet },
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn globs<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();
        let set = build_glob_set(&patterns)?;
        Ok(Matcher::Glob { patterns, set })
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        match self {
            Matcher::Glob { set, .. } => set.is_match(rel_path),
            Matcher::Predicate(f) => f(rel_path),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Glob { patterns, .. } => f.debug_tuple("Glob").field(patterns).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Configuration describing how matched files become documents.
///
/// Descriptors carry data only; once added to a
/// [`HandlerRegistry`](crate::handler::HandlerRegistry) they are never changed.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    pub name: String,
    pub matcher: Matcher,
    /// Replaces the input extension. An empty string strips it.
    pub suffix: String,
    pub template: Option<String>,
    pub renderer: Option<String>,
    pub front_matter: FrontMatterFormat,
    pub require_front_matter: bool,
    /// When false the document is indexed for queries but never written.
    pub output: bool,
}

impl HandlerDescriptor {
    pub fn new(name: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            matcher,
            suffix: DEFAULT_SUFFIX.to_string(),
            template: None,
            renderer: None,
            front_matter: FrontMatterFormat::default(),
            require_front_matter: false,
            output: true,
        }
    }

    pub fn glob<S: AsRef<str>>(name: impl Into<String>, patterns: &[S]) -> Result<Self> {
        Ok(Self::new(name, Matcher::globs(patterns)?))
    }

    pub fn predicate<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::new(name, Matcher::Predicate(Arc::new(f)))
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    pub fn with_front_matter(mut self, format: FrontMatterFormat) -> Self {
        self.front_matter = format;
        self
    }

    pub fn requiring_front_matter(mut self) -> Self {
        self.require_front_matter = true;
        self
    }

    pub fn without_output(mut self) -> Self {
        self.output = false;
        self
    }

    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }

    /// Output path for `rel_path`, or `None` for handlers that never write.
    pub fn output_path(&self, rel_path: &str) -> Option<String> {
        if !self.output {
            return None;
        }
        let ext = self.suffix.strip_prefix('.').unwrap_or(&self.suffix);
        let out = Path::new(rel_path).with_extension(ext);
        Some(out.to_string_lossy().into_owned())
    }
}
