//! Inspect command - show the structure of a data file.

use std::path::PathBuf;

use colored::Colorize;
use sheetsim::{Parser, SourceValidation, TableOverview};

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, metadata) = match Parser::new().parse_file(&file) {
        Ok(parsed) => parsed,
        Err(e) if json_output => {
            let validation = SourceValidation::unreadable(&file, e);
            println!("{}", serde_json::to_string_pretty(&validation)?);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let validation = SourceValidation::from_table(&table, &metadata);
    let overview = TableOverview::from_table(&table);

    if json_output {
        let report = serde_json::json!({
            "validation": validation,
            "overview": overview,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Inspecting".cyan().bold(),
        file.display().to_string().white()
    );
    println!();
    println!(
        "  {} rows, {} columns, {} duplicate rows, {} bytes",
        validation.total_rows.to_string().white().bold(),
        validation.total_columns.to_string().white().bold(),
        validation.duplicate_rows,
        validation.size_bytes
    );
    if verbose {
        if let Some(ref hash) = validation.hash {
            println!("  {}", hash.dimmed());
        }
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for name in &validation.columns {
        let kind = validation
            .data_types
            .get(name)
            .map(|k| k.as_str())
            .unwrap_or("?");
        let nulls = validation.null_counts.get(name).copied().unwrap_or(0);
        print!("  {:24} {:8} {:>6} null", name, kind, nulls);
        if let Some(stats) = overview.summary_stats.get(name) {
            print!(
                "   mean {:.2}, std {:.2}, min {}, median {}, max {}",
                stats.mean, stats.std, stats.min, stats.median, stats.max
            );
        }
        println!();
    }

    if !overview.sample_data.is_empty() {
        println!();
        println!("{}", "Sample rows:".yellow().bold());
        for record in &overview.sample_data {
            let cells: Vec<String> = record.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            println!("  {}", cells.join(", "));
        }
    }

    Ok(())
}
