use std::collections::HashMap;
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};
use tera::Value;

use crate::error::{Result, TreesmithError};
use crate::render::index::{BuildIndex, DocumentNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Patterns see full input paths; `*` crosses `/`.
    Root,
    /// Patterns see paths relative to this folder (`""` is the input root),
    /// and `*` stays within one path segment.
    Folder(String),
}

/// Read-only glob query over a frozen [`BuildIndex`].
///
/// Exposed to templates as the `root(pattern=...)` and `folder(pattern=...)`
/// functions.
#[derive(Debug, Clone)]
pub struct Globber {
    index: Arc<BuildIndex>,
    scope: Scope,
}

impl Globber {
    pub fn root(index: Arc<BuildIndex>) -> Self {
        Self {
            index,
            scope: Scope::Root,
        }
    }

    pub fn folder(index: Arc<BuildIndex>, folder: impl Into<String>) -> Self {
        Self {
            index,
            scope: Scope::Folder(folder.into()),
        }
    }

    /// Documents matching `pattern`, in lexicographic path order.
    ///
    /// Evaluated afresh on every call.
    pub fn glob<'a>(
        &'a self,
        pattern: &str,
    ) -> Result<impl Iterator<Item = &'a DocumentNode> + 'a> {
        let matcher = compile(pattern, matches!(self.scope, Scope::Folder(_)))?;
        let scope = &self.scope;
        Ok(self
            .index
            .iter()
            .filter(move |doc| match scoped_path(scope, &doc.input_path) {
                Some(path) => matcher.is_match(path),
                None => false,
            }))
    }

    fn function_name(&self) -> &'static str {
        match self.scope {
            Scope::Root => "root",
            Scope::Folder(_) => "folder",
        }
    }
}

impl tera::Function for Globber {
    fn call(&self, args: &HashMap<String, Value>) -> tera::Result<Value> {
        let name = self.function_name();
        let pattern = match args.get("pattern") {
            Some(Value::String(p)) => p,
            Some(_) => {
                return Err(tera::Error::msg(format!(
                    "`{name}`: `pattern` must be a string"
                )))
            }
            None => {
                return Err(tera::Error::msg(format!(
                    "`{name}` requires a `pattern` argument"
                )))
            }
        };

        let docs = self
            .glob(pattern)
            .map_err(|e| tera::Error::msg(format!("`{name}`: {e}")))?;
        Ok(Value::Array(docs.map(DocumentNode::to_value).collect()))
    }
}

fn compile(pattern: &str, literal_separator: bool) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(literal_separator)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| TreesmithError::GlobPattern {
            pattern: pattern.to_string(),
            source: e,
        })
}

/// The path a pattern is matched against, or `None` when outside the scope.
fn scoped_path<'p>(scope: &Scope, input_path: &'p str) -> Option<&'p str> {
    match scope {
        Scope::Root => Some(input_path),
        Scope::Folder(folder) if folder.is_empty() => Some(input_path),
        Scope::Folder(folder) => input_path
            .strip_prefix(folder.as_str())
            .and_then(|rest| rest.strip_prefix('/')),
    }
}
