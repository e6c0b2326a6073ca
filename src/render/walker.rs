use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TreesmithError};
use crate::front_matter::FrontMatter;
use crate::handler::{HandlerDescriptor, HandlerRegistry};
use crate::render::index::{BuildIndex, DocumentNode};
use crate::render::slash_path;
use crate::renderers::RendererRegistry;

/// Everything found in the input tree, before any rendering.
#[derive(Debug)]
pub struct Collection {
    pub input_root: PathBuf,
    pub index: BuildIndex,
    /// Files no handler claimed, copied verbatim.
    pub assets: Vec<String>,
}

/// Collects an input tree into a [`Collection`].
pub struct TreeWalker<'a> {
    handlers: &'a HandlerRegistry,
    renderers: &'a RendererRegistry,
    exclude: Vec<PathBuf>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(handlers: &'a HandlerRegistry, renderers: &'a RendererRegistry) -> Self {
        Self {
            handlers,
            renderers,
            exclude: Vec::new(),
        }
    }

    /// Skip `path` (and everything below it) while walking.
    pub fn exclude(mut self, path: &Path) -> Self {
        if let Ok(canonical) = path.canonicalize() {
            self.exclude.push(canonical);
        }
        self
    }

    pub fn walk(&self, input_root: &Path) -> Result<Collection> {
        if !input_root.is_dir() {
            return Err(TreesmithError::InputDirectoryMissing {
                path: input_root.to_path_buf(),
            });
        }
        let root = input_root.canonicalize().map_err(|e| TreesmithError::Io {
            context: format!("resolving {}", input_root.display()),
            source: e,
        })?;

        let mut index = BuildIndex::new();
        let mut assets = Vec::new();

        // Linked directories are walked like real ones; walkdir reports loops.
        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.exclude.iter().any(|x| e.path().starts_with(x)));

        for entry in walker {
            let entry = entry.map_err(|e| TreesmithError::Io {
                context: format!("walking {}", root.display()),
                source: e.into(),
            })?;
            if entry.file_type().is_dir() {
                continue;
            }

            let rel = slash_path(entry.path(), &root);
            match self.handlers.resolve(&rel) {
                Some(handler) => {
                    let doc = self.collect_document(entry.path(), rel, handler)?;
                    index.insert(doc)?;
                }
                None => assets.push(rel),
            }
        }

        Ok(Collection {
            input_root: root,
            index,
            assets,
        })
    }

    fn collect_document(
        &self,
        path: &Path,
        rel: String,
        handler: &HandlerDescriptor,
    ) -> Result<DocumentNode> {
        let text = std::fs::read_to_string(path).map_err(|e| TreesmithError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;

        let (front_matter, body) = match handler.front_matter.decode(&text) {
            Ok((front_matter, rest)) => (Some(front_matter), rest),
            Err(e) if handler.require_front_matter => {
                return Err(TreesmithError::FrontMatterRequired {
                    path: rel,
                    reason: e.to_string(),
                })
            }
            Err(_) => (None, text),
        };

        let renderer = string_field(front_matter.as_ref(), "renderer", &rel)?
            .or_else(|| handler.renderer.clone());
        let template = string_field(front_matter.as_ref(), "template", &rel)?
            .or_else(|| handler.template.clone());

        let body = match renderer {
            Some(name) => {
                let render = self.renderers.get(&name).ok_or_else(|| {
                    TreesmithError::UnknownRenderer {
                        name: name.clone(),
                        document: rel.clone(),
                    }
                })?;
                render(&body)
            }
            None => body,
        };

        Ok(DocumentNode {
            output_path: handler.output_path(&rel),
            input_path: rel,
            front_matter,
            body,
            template,
        })
    }
}

/// Read an optional string override from front matter.
fn string_field(
    front_matter: Option<&FrontMatter>,
    key: &str,
    document: &str,
) -> Result<Option<String>> {
    match front_matter.and_then(|fm| fm.get(key)) {
        None => Ok(None),
        Some(tera::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(TreesmithError::InvalidFrontMatterField {
            document: document.to_string(),
            key: key.to_string(),
            reason: format!("expected a string, found {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::front_matter::FrontMatterFormat;
    use std::fs;

    fn markdown_handlers() -> HandlerRegistry {
        HandlerRegistry::new().with(
            HandlerDescriptor::glob("markdown", &["*.md"])
                .unwrap()
                .with_renderer("markdown")
                .with_template("page"),
        )
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn documents_are_indexed_and_assets_listed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "{\"title\": \"Home\"}\n# Home\n");
        write(dir.path(), "blog/post.md", "# Post\n");
        write(dir.path(), "css/site.css", "body {}");

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::with_defaults();
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        assert_eq!(collection.index.len(), 2);
        assert_eq!(collection.assets, vec!["css/site.css"]);

        let home = collection.index.get("index.md").unwrap();
        assert_eq!(home.front_matter.as_ref().unwrap()["title"], "Home");
        assert!(home.body.contains("<h1>Home</h1>"));
        assert_eq!(home.output_path.as_deref(), Some("index.html"));
        assert_eq!(home.template.as_deref(), Some("page"));

        let post = collection.index.get("blog/post.md").unwrap();
        assert!(post.front_matter.is_none());
        assert_eq!(post.output_path.as_deref(), Some("blog/post.html"));
    }

    #[test]
    fn missing_front_matter_keeps_whole_text_as_body() {
        let dir = tempfile::tempdir().unwrap();
        let text = "\nplain text, no metadata\n";
        write(dir.path(), "notes.txt", text);

        let handlers =
            HandlerRegistry::new().with(HandlerDescriptor::glob("text", &["*.txt"]).unwrap());
        let renderers = RendererRegistry::new();
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        let doc = collection.index.get("notes.txt").unwrap();
        assert!(doc.front_matter.is_none());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn front_matter_after_blank_lines_is_body() {
        let dir = tempfile::tempdir().unwrap();
        let text = "\n{\"title\": \"late\"}\nbody\n";
        write(dir.path(), "notes.txt", text);

        let handlers =
            HandlerRegistry::new().with(HandlerDescriptor::glob("text", &["*.txt"]).unwrap());
        let renderers = RendererRegistry::new();
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        let doc = collection.index.get("notes.txt").unwrap();
        assert!(doc.front_matter.is_none());
        assert_eq!(doc.body, text);
    }

    #[test]
    fn required_front_matter_fails_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "post.md", "no metadata here");

        let handlers = HandlerRegistry::new().with(
            HandlerDescriptor::glob("strict", &["*.md"])
                .unwrap()
                .requiring_front_matter(),
        );
        let renderers = RendererRegistry::new();
        let err = TreeWalker::new(&handlers, &renderers)
            .walk(dir.path())
            .unwrap_err();

        assert!(matches!(err, TreesmithError::FrontMatterRequired { path, .. } if path == "post.md"));
    }

    #[test]
    fn front_matter_overrides_template_and_renderer() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "raw.md",
            "{\"template\": \"x\", \"renderer\": \"shout\"}\nhello",
        );

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::with_defaults().register("shout", |s| s.to_uppercase());
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        let doc = collection.index.get("raw.md").unwrap();
        assert_eq!(doc.template.as_deref(), Some("x"));
        assert_eq!(doc.body, "HELLO");
    }

    #[test]
    fn non_string_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "{\"template\": 3}\nbody");

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::with_defaults();
        let err = TreeWalker::new(&handlers, &renderers)
            .walk(dir.path())
            .unwrap_err();

        assert!(matches!(err, TreesmithError::InvalidFrontMatterField { key, .. } if key == "template"));
    }

    #[test]
    fn unknown_renderer_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "body");

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::new();
        let err = TreeWalker::new(&handlers, &renderers)
            .walk(dir.path())
            .unwrap_err();

        assert!(matches!(err, TreesmithError::UnknownRenderer { name, .. } if name == "markdown"));
    }

    #[test]
    fn toml_front_matter_handler() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "+++\ntitle = \"T\"\n+++\nbody");

        let handlers = HandlerRegistry::new().with(
            HandlerDescriptor::glob("toml", &["*.md"])
                .unwrap()
                .with_front_matter(FrontMatterFormat::Toml),
        );
        let renderers = RendererRegistry::new();
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        let doc = collection.index.get("a.md").unwrap();
        assert_eq!(doc.front_matter.as_ref().unwrap()["title"], "T");
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn excluded_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "x");
        write(dir.path(), "public/index.html", "old output");

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::with_defaults();
        let collection = TreeWalker::new(&handlers, &renderers)
            .exclude(&dir.path().join("public"))
            .walk(dir.path())
            .unwrap();

        assert!(collection.assets.is_empty());
        assert_eq!(collection.index.len(), 1);
    }

    #[test]
    fn missing_input_directory() {
        let dir = tempfile::tempdir().unwrap();
        let handlers = HandlerRegistry::new();
        let renderers = RendererRegistry::new();
        let err = TreeWalker::new(&handlers, &renderers)
            .walk(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, TreesmithError::InputDirectoryMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_walked() {
        let outside = tempfile::tempdir().unwrap();
        write(outside.path(), "post.md", "# Linked\n");
        write(outside.path(), "photo.jpg", "jpeg");

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "# Home\n");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked")).unwrap();

        let handlers = markdown_handlers();
        let renderers = RendererRegistry::with_defaults();
        let collection = TreeWalker::new(&handlers, &renderers).walk(dir.path()).unwrap();

        assert_eq!(collection.assets, vec!["linked/photo.jpg"]);
        let post = collection.index.get("linked/post.md").unwrap();
        assert_eq!(post.output_path.as_deref(), Some("linked/post.html"));
        assert!(post.body.contains("<h1>Linked</h1>"));
    }
}
