pub mod context;
pub mod globber;
pub mod index;
pub mod templates;
pub mod walker;
pub mod writer;

use std::path::Path;

use crate::error::Result;
use crate::handler::HandlerRegistry;
use crate::renderers::RendererRegistry;

pub use context::build_context;
pub use globber::{Globber, Scope};
pub use index::{BuildIndex, DocumentNode};
pub use templates::TemplateSet;
pub use walker::{Collection, TreeWalker};
pub use writer::{
    execute_plan, render_collection, render_document, BuildPlan, BuiltSite, PlannedContent,
    PlannedFile,
};

/// Collect the input tree, render every document, and write the output.
pub fn walk_and_render(
    input_dir: &Path,
    output_dir: &Path,
    handlers: &HandlerRegistry,
    renderers: &RendererRegistry,
    templates: &mut TemplateSet,
) -> Result<BuiltSite> {
    let collection = TreeWalker::new(handlers, renderers)
        .exclude(output_dir)
        .walk(input_dir)?;
    let plan = render_collection(collection, templates)?;
    execute_plan(&plan, output_dir)
}

/// `path` relative to `root`, joined with `/` regardless of platform.
pub(crate) fn slash_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
