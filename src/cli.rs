use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "treesmith",
    about = "Build an output tree from documents, templates and assets",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the site into the output directory
    Build {
        /// Path to treesmith.toml (default: ./treesmith.toml if present)
        #[arg(short, long)]
        config: Option<String>,

        /// Input directory (overrides [build] input)
        #[arg(short, long)]
        input: Option<String>,

        /// Output directory (overrides [build] output)
        #[arg(short, long)]
        output: Option<String>,

        /// Template directory (overrides [build] templates)
        #[arg(short, long)]
        templates: Option<String>,

        /// Show planned files without writing anything
        #[arg(long)]
        dry_run: bool,

        /// List every file as it is planned
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate the configuration, handlers and templates
    Check {
        /// Path to treesmith.toml (default: ./treesmith.toml if present)
        #[arg(short, long)]
        config: Option<String>,
    },
}
