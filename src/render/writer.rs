use std::fs::{File, Permissions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::error::{Result, TreesmithError};
use crate::render::context::build_context;
use crate::render::globber::Globber;
use crate::render::index::{BuildIndex, DocumentNode};
use crate::render::templates::TemplateSet;
use crate::render::walker::Collection;

#[derive(Debug)]
pub struct BuiltSite {
    pub output_dir: PathBuf,
    pub files_rendered: Vec<String>,
    pub files_copied: Vec<String>,
}

pub enum PlannedContent {
    /// Text produced from a document.
    Rendered(String),
    /// Absolute path of an input file copied byte for byte.
    Copy(PathBuf),
}

/// A file that would be written during the build.
pub struct PlannedFile {
    /// Slash-separated path relative to the output directory.
    pub relative_path: String,
    /// Input path the file comes from.
    pub source: String,
    pub content: PlannedContent,
}

impl PlannedFile {
    pub fn is_copy(&self) -> bool {
        matches!(self.content, PlannedContent::Copy(_))
    }
}

/// The result of rendering a collection without writing to disk.
pub struct BuildPlan {
    /// Copied assets first, then documents in path order.
    pub files: Vec<PlannedFile>,
    /// Documents whose handler declares no output.
    pub skipped: Vec<String>,
    pub index: Arc<BuildIndex>,
}

/// Render every document of a fully collected tree.
///
/// Each template sees the whole index through `root(pattern=...)` and the
/// document's own folder through `folder(pattern=...)`.
pub fn render_collection(collection: Collection, templates: &mut TemplateSet) -> Result<BuildPlan> {
    let Collection {
        input_root,
        index,
        assets,
    } = collection;
    let index = Arc::new(index);

    let mut files: Vec<PlannedFile> = assets
        .into_iter()
        .map(|rel| PlannedFile {
            content: PlannedContent::Copy(input_root.join(&rel)),
            relative_path: rel.clone(),
            source: rel,
        })
        .collect();
    let mut skipped = Vec::new();

    for doc in index.iter() {
        let Some(output_path) = &doc.output_path else {
            skipped.push(doc.input_path.clone());
            continue;
        };
        let rendered = render_document(doc, &index, templates)?;
        files.push(PlannedFile {
            relative_path: output_path.clone(),
            source: doc.input_path.clone(),
            content: PlannedContent::Rendered(rendered),
        });
    }

    Ok(BuildPlan {
        files,
        skipped,
        index,
    })
}

/// Output text for one document: its template rendered, or the body as-is.
pub fn render_document(
    doc: &DocumentNode,
    index: &Arc<BuildIndex>,
    templates: &mut TemplateSet,
) -> Result<String> {
    let Some(name) = &doc.template else {
        return Ok(doc.body.clone());
    };
    if !templates.contains(name) {
        return Err(TreesmithError::TemplateNotFound {
            template: name.clone(),
            document: doc.input_path.clone(),
        });
    }

    let file_name = templates.file_name(name);
    let tera = templates.engine_mut();
    tera.register_function("root", Globber::root(Arc::clone(index)));
    tera.register_function("folder", Globber::folder(Arc::clone(index), doc.folder()));
    tera.render(&file_name, &build_context(doc))
        .map_err(|e| TreesmithError::RenderError {
            document: doc.input_path.clone(),
            source: e,
        })
}

/// Write the files from a build plan to disk.
///
/// Existing files are never replaced: a destination that already exists is an
/// [`OutputCollision`](TreesmithError::OutputCollision).
pub fn execute_plan(plan: &BuildPlan, output_dir: &Path) -> Result<BuiltSite> {
    let mut files_rendered = Vec::new();
    let mut files_copied = Vec::new();

    for file in &plan.files {
        let dest = output_dir.join(checked_relative(&file.relative_path)?);
        match &file.content {
            PlannedContent::Rendered(text) => {
                write_new(&dest, &file.source, rendered_permissions(), |out| {
                    out.write_all(text.as_bytes())
                })?;
                files_rendered.push(file.relative_path.clone());
            }
            PlannedContent::Copy(src) => {
                let mut input = File::open(src).map_err(|e| TreesmithError::Io {
                    context: format!("opening {}", src.display()),
                    source: e,
                })?;
                let permissions = input
                    .metadata()
                    .map_err(|e| TreesmithError::Io {
                        context: format!("reading metadata of {}", src.display()),
                        source: e,
                    })?
                    .permissions();
                write_new(&dest, &file.source, Some(permissions), |out| {
                    io::copy(&mut input, out).map(drop)
                })?;
                files_copied.push(file.relative_path.clone());
            }
        }
    }

    Ok(BuiltSite {
        output_dir: output_dir.to_path_buf(),
        files_rendered,
        files_copied,
    })
}

/// Reject output paths that are absolute or climb out of the output root.
fn checked_relative(rel: &str) -> Result<&Path> {
    let path = Path::new(rel);
    let safe = !rel.is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)));
    if safe {
        Ok(path)
    } else {
        Err(TreesmithError::UnsafeOutputPath {
            path: rel.to_string(),
        })
    }
}

/// Mode for rendered files, matching a plain create under the usual 022 umask.
#[cfg(unix)]
fn rendered_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn rendered_permissions() -> Option<Permissions> {
    None
}

/// Write through a temporary file in the destination directory, then move it
/// into place only if nothing exists there yet.
///
/// Temporary files are created owner-only, so `permissions` is applied before
/// the move.
fn write_new<F>(
    dest: &Path,
    document: &str,
    permissions: Option<Permissions>,
    fill: F,
) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let collision = || TreesmithError::OutputCollision {
        path: dest.to_path_buf(),
        document: document.to_string(),
    };
    if dest.exists() {
        return Err(collision());
    }

    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| TreesmithError::Io {
        context: format!("creating directory {}", parent.display()),
        source: e,
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| TreesmithError::Io {
        context: format!("creating temporary file in {}", parent.display()),
        source: e,
    })?;
    fill(tmp.as_file_mut()).map_err(|e| TreesmithError::Io {
        context: format!("writing {}", dest.display()),
        source: e,
    })?;
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| TreesmithError::Io {
                context: format!("setting permissions of {}", dest.display()),
                source: e,
            })?;
    }

    tmp.persist_noclobber(dest).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            collision()
        } else {
            TreesmithError::Io {
                context: format!("writing {}", dest.display()),
                source: e.error,
            }
        }
    })?;
    Ok(())
}
