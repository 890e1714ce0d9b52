//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sheetsim: fuzzy comparison and profiling of spreadsheet columns
#[derive(Parser)]
#[command(name = "sheetsim")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match one column of FILE1 against one column of FILE2
    Compare {
        /// First data file (CSV/TSV or XLSX/XLS/ODS); its column supplies the values to match
        #[arg(value_name = "FILE1")]
        file1: PathBuf,

        /// Second data file (CSV/TSV or XLSX/XLS/ODS); its column supplies the candidates
        #[arg(value_name = "FILE2")]
        file2: PathBuf,

        /// Column to compare in FILE1
        #[arg(long)]
        column1: String,

        /// Column to compare in FILE2
        #[arg(long)]
        column2: String,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the Markdown report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Skip column profiling
        #[arg(long)]
        no_profile: bool,
    },

    /// Profile a single column
    Profile {
        /// Path to the data file (CSV/TSV or XLSX/XLS/ODS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to profile
        #[arg(long)]
        column: String,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the structure of a data file and check that it can be read
    Inspect {
        /// Path to the data file (CSV/TSV or XLSX/XLS/ODS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
