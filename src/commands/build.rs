use std::path::PathBuf;

use console::style;
use miette::Result;
use treesmith::render::{BuildPlan, PlannedContent};
use treesmith::renderers::RendererRegistry;
use treesmith::BuildOptions;

pub fn run(
    config: Option<String>,
    input: Option<String>,
    output: Option<String>,
    templates: Option<String>,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    let options = BuildOptions {
        config: config.map(PathBuf::from),
        input: input.map(PathBuf::from),
        output: output.map(PathBuf::from),
        templates: templates.map(PathBuf::from),
    };

    let plan = treesmith::plan_build(&options, &RendererRegistry::with_defaults())?;

    if dry_run || verbose {
        println!(
            "\n{} Files planned from {} for {}:",
            style("==>").cyan().bold(),
            style(plan.input_dir.display()).cyan(),
            style(plan.output_dir.display()).cyan()
        );
        print_plan(&plan.render_plan, dry_run && verbose);
    }

    if dry_run {
        let rendered = plan.render_plan.files.iter().filter(|f| !f.is_copy()).count();
        let copied = plan.render_plan.files.len() - rendered;
        println!(
            "\nSummary: {} rendered, {} copied, {} without output",
            rendered,
            copied,
            plan.render_plan.skipped.len()
        );
        println!(
            "\n{} Dry run, no files written.",
            style("\u{2139}").blue().bold()
        );
        return Ok(());
    }

    treesmith::execute_build(&plan)?;
    Ok(())
}

fn print_plan(plan: &BuildPlan, show_content: bool) {
    for file in &plan.files {
        let action = if file.is_copy() { "copy  " } else { "render" };
        println!(
            "  {} {} {}",
            style(action).green(),
            file.relative_path,
            style(format!("<- {}", file.source)).dim()
        );

        if show_content {
            if let PlannedContent::Rendered(text) = &file.content {
                println!("  {}", style("──────").dim());
                for line in text.lines() {
                    println!("  {}", line);
                }
                println!("  {}", style("──────").dim());
                println!();
            }
        }
    }
    for skipped in &plan.skipped {
        println!("  {} {}", style("skip  ").yellow(), skipped);
    }
}
