mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> miette::Result<()> {
    match Cli::parse().command {
        Commands::Build {
            config,
            input,
            output,
            templates,
            dry_run,
            verbose,
        } => commands::build::run(config, input, output, templates, dry_run, verbose),
        Commands::Check { config } => commands::check::run(config),
    }
}
