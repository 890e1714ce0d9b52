//! Sheetsim CLI - fuzzy comparison of spreadsheet columns.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let result = match cli.command {
        Commands::Compare {
            file1,
            file2,
            column1,
            column2,
            config,
            output,
            json,
            no_profile,
        } => commands::compare::run(
            commands::compare::CompareArgs {
                file1,
                file2,
                column1,
                column2,
                config,
                output,
                json,
                no_profile,
            },
            cli.verbose,
        ),

        Commands::Profile {
            file,
            column,
            config,
            json,
        } => commands::profile::run(file, column, config, json),

        Commands::Inspect { file, json } => commands::inspect::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
