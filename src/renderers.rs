use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use comrak::{markdown_to_html, Options};

pub type RenderFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Named body transforms selectable per handler or per document.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<String, RenderFn>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `markdown` renderer.
    pub fn with_defaults() -> Self {
        Self::new().register("markdown", render_markdown)
    }

    pub fn register<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.renderers.insert(name.into(), Arc::new(f));
        self
    }

    pub fn get(&self, name: &str) -> Option<&RenderFn> {
        self.renderers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}

/// CommonMark with the GitHub table, strikethrough and autolink extensions.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    markdown_to_html(source, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_renders_to_html() {
        let html = render_markdown("# Title\n\nSome *emphasis*.\n");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn markdown_tables_are_enabled() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn custom_renderers_can_be_registered() {
        let registry = RendererRegistry::with_defaults().register("shout", |s| s.to_uppercase());
        let shout = registry.get("shout").unwrap();
        assert_eq!(shout("hi"), "HI");
        assert!(registry.contains("markdown"));
        assert!(!registry.contains("rst"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["markdown", "shout"]);
    }
}
