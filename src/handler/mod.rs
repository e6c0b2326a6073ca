pub mod descriptor;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::{Result, TreesmithError};

pub use descriptor::{HandlerDescriptor, Matcher, DEFAULT_SUFFIX};

/// Ordered set of handlers. The most recently added match wins.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    descriptors: Vec<HandlerDescriptor>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, descriptor: HandlerDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with(mut self, descriptor: HandlerDescriptor) -> Self {
        self.add(descriptor);
        self
    }

    /// Find the handler responsible for a slash-separated relative path.
    pub fn resolve(&self, rel_path: &str) -> Option<&HandlerDescriptor> {
        self.descriptors.iter().rev().find(|d| d.matches(rel_path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

pub(crate) fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| TreesmithError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| TreesmithError::GlobPattern {
        pattern: "<combined>".into(),
        source: e,
    })
}
