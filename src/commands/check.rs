use std::path::PathBuf;

use console::style;
use miette::Result;

use treesmith::check::check_site;
use treesmith::renderers::RendererRegistry;
use treesmith::BuildOptions;

pub fn run(config: Option<String>) -> Result<()> {
    let options = BuildOptions {
        config: config.map(PathBuf::from),
        input: None,
        output: None,
        templates: None,
    };
    let site = treesmith::resolve_config(&options)?;

    println!(
        "{} {}",
        style("Checking site at").bold(),
        style(site.build.input.display()).cyan()
    );

    let result = check_site(&site, &RendererRegistry::with_defaults());

    println!("  Handlers: {}", result.handler_count);
    println!("  Templates: {}", result.template_names.len());

    if !result.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &result.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if !result.is_ok() {
        println!("\n{}", style("Errors:").red().bold());
        for e in &result.errors {
            println!("  {} {}", style("✗").red(), e);
        }
        println!(
            "\n{} Site has {} error(s)",
            style("✗").red().bold(),
            result.errors.len()
        );
        std::process::exit(1);
    }

    println!("\n{} Site is valid!", style("✓").green().bold());
    Ok(())
}
