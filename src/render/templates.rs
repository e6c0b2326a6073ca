use std::path::{Path, PathBuf};

use tera::Tera;
use walkdir::WalkDir;

use crate::error::{Result, TreesmithError};
use crate::render::slash_path;

/// Templates available to a build, looked up by name plus a fixed suffix.
pub struct TemplateSet {
    tera: Tera,
    suffix: String,
}

/// A Tera engine that never autoescapes, whatever the template suffix.
fn engine() -> Tera {
    let mut tera = Tera::default();
    tera.autoescape_on(Vec::new());
    tera
}

impl TemplateSet {
    /// Load every file ending in `suffix` under `dir`, named by its
    /// slash-separated relative path. A missing directory gives an empty set.
    pub fn load(dir: &Path, suffix: &str) -> Result<Self> {
        let mut tera = engine();

        if dir.is_dir() {
            let mut files: Vec<(PathBuf, Option<String>)> = Vec::new();
            for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
                let entry = entry.map_err(|e| TreesmithError::Io {
                    context: format!("walking template directory {}", dir.display()),
                    source: e.into(),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let rel = slash_path(entry.path(), dir);
                if rel.ends_with(suffix) {
                    files.push((entry.path().to_path_buf(), Some(rel)));
                }
            }
            tera.add_template_files(files)
                .map_err(|e| TreesmithError::TemplateLoad { source: e })?;
        }

        Ok(Self {
            tera,
            suffix: suffix.to_string(),
        })
    }

    pub fn empty(suffix: &str) -> Self {
        Self {
            tera: engine(),
            suffix: suffix.to_string(),
        }
    }

    /// Template set built from in-memory sources, keyed by name without suffix.
    pub fn from_raw<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
        suffix: &str,
    ) -> Result<Self> {
        let mut tera = engine();
        let named: Vec<(String, &str)> = templates
            .into_iter()
            .map(|(name, body)| (format!("{name}{suffix}"), body))
            .collect();
        tera.add_raw_templates(named)
            .map_err(|e| TreesmithError::TemplateLoad { source: e })?;
        Ok(Self {
            tera,
            suffix: suffix.to_string(),
        })
    }

    /// The engine-level name of template `name`.
    pub fn file_name(&self, name: &str) -> String {
        format!("{name}{}", self.suffix)
    }

    pub fn contains(&self, name: &str) -> bool {
        let file_name = self.file_name(name);
        self.tera.get_template_names().any(|n| n == file_name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .filter_map(|n| n.strip_suffix(self.suffix.as_str()))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    pub(crate) fn engine_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }
}
