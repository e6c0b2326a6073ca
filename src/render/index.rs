use std::collections::BTreeMap;

use tera::{Map, Value};

use crate::error::{Result, TreesmithError};
use crate::front_matter::FrontMatter;

/// One input file claimed by a handler.
///
/// Everything is fixed when the node is created during the walk; rendering
/// only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    /// Slash-separated path relative to the input root.
    pub input_path: String,
    pub front_matter: Option<FrontMatter>,
    pub body: String,
    /// Slash-separated path relative to the output root, `None` for partials.
    pub output_path: Option<String>,
    pub template: Option<String>,
}

impl DocumentNode {
    /// Directory containing this document, `""` at the input root.
    pub fn folder(&self) -> &str {
        self.input_path
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir)
    }

    /// Read-only view handed to templates through glob queries.
    pub fn to_value(&self) -> Value {
        let mut view = Map::new();
        view.insert("path".into(), Value::String(self.input_path.clone()));
        view.insert(
            "output_path".into(),
            self.output_path.clone().map_or(Value::Null, Value::String),
        );
        view.insert(
            "front_matter".into(),
            self.front_matter.clone().map_or(Value::Null, Value::Object),
        );
        view.insert("body".into(), Value::String(self.body.clone()));
        Value::Object(view)
    }
}

/// Every document of a build keyed by input path, in lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct BuildIndex {
    documents: BTreeMap<String, DocumentNode>,
}

impl BuildIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. Entries are never replaced.
    pub fn insert(&mut self, node: DocumentNode) -> Result<()> {
        if self.documents.contains_key(&node.input_path) {
            return Err(TreesmithError::DuplicateDocument {
                path: node.input_path,
            });
        }
        self.documents.insert(node.input_path.clone(), node);
        Ok(())
    }

    pub fn get(&self, input_path: &str) -> Option<&DocumentNode> {
        self.documents.get(input_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentNode> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn node(path: &str) -> DocumentNode {
    DocumentNode {
        input_path: path.to_string(),
        front_matter: None,
        body: String::new(),
        output_path: None,
        template: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut index = BuildIndex::new();
        index.insert(node("a.md")).unwrap();

        let err = index.insert(node("a.md")).unwrap_err();
        assert!(matches!(err, TreesmithError::DuplicateDocument { path } if path == "a.md"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn iteration_is_lexicographic() {
        let mut index = BuildIndex::new();
        for path in ["z.md", "blog/b.md", "a.md", "blog/a.md"] {
            index.insert(node(path)).unwrap();
        }
        let paths: Vec<_> = index.iter().map(|n| n.input_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "blog/a.md", "blog/b.md", "z.md"]);
    }

    #[test]
    fn folder_is_parent_directory() {
        assert_eq!(node("index.md").folder(), "");
        assert_eq!(node("blog/2024/post.md").folder(), "blog/2024");
    }

    #[test]
    fn value_view_exposes_metadata() {
        let mut fm = FrontMatter::new();
        fm.insert("title".into(), Value::String("T".into()));
        let doc = DocumentNode {
            input_path: "a.md".into(),
            front_matter: Some(fm),
            body: "<p>x</p>".into(),
            output_path: Some("a.html".into()),
            template: None,
        };
        let value = doc.to_value();
        assert_eq!(value["path"], "a.md");
        assert_eq!(value["output_path"], "a.html");
        assert_eq!(value["front_matter"]["title"], "T");
        assert_eq!(value["body"], "<p>x</p>");
        assert!(node("b.md").to_value()["front_matter"].is_null());
    }
}
