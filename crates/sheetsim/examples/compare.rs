//! Example: Compare one column of two spreadsheets.
//!
//! Usage:
//!   cargo run --example compare -- <file1> <column1> <file2> <column2>
//!
//! Example:
//!   cargo run --example compare -- budget_2023.csv Material budget_2024.csv Item

use std::env;

use sheetsim::Comparator;

fn main() -> sheetsim::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: cargo run --example compare -- <file1> <column1> <file2> <column2>");
        std::process::exit(1);
    }

    let result = Comparator::new().compare_files(&args[1], &args[2], &args[3], &args[4])?;

    let a = &result.similarity_analysis;
    println!("=== Similarity ===");
    println!("Average: {:.2}%  Median: {:.2}%", a.average_score, a.median_score);
    println!(
        "High: {}  Medium: {}  Low: {}",
        a.high_similarity_count, a.medium_similarity_count, a.low_similarity_count
    );

    println!("\n=== Recommendations ===");
    for rec in &result.recommendations {
        println!("  {}", rec);
    }

    println!("\n=== Matches ===");
    for (original, detail) in &result.detailed_matches {
        println!("  {:>5.1}%  {} -> {}", detail.score, original, detail.matched);
    }

    Ok(())
}
