//! nestattr CLI
//!
//! Command-line front end for nested attributes reconciliation

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nestattr")]
#[command(about = "nestattr - Nested attributes reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a TOML declaration file
    CheckConfig(commands::check_config::CheckConfigArgs),
    /// Reconcile nested input against a fixture of existing children
    Apply(commands::apply::ApplyArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::CheckConfig(args) => commands::check_config::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
