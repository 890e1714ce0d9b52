//! Profile command - describe the patterns of a single column.

use std::path::PathBuf;

use colored::Colorize;
use sheetsim::Comparator;
use sheetsim::profile::ColumnPatterns;

pub fn run(
    file: PathBuf,
    column: String,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = super::load_config(config.as_deref())?;
    let profile = Comparator::with_config(config).profile_file(&file, &column)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "{} {} [{}]",
        "Profile of".cyan().bold(),
        file.display().to_string().white(),
        column
    );
    println!();
    println!("  Data type:     {}", profile.data_type.as_str().white().bold());
    println!("  Total values:  {}", profile.total_values);
    println!("  Unique values: {}", profile.unique_values);
    println!("  Null values:   {}", profile.null_values);
    println!("  Duplicates:    {}", profile.duplicates);

    match &profile.patterns {
        Some(ColumnPatterns::Text(t)) => {
            println!();
            println!("{}", "Text patterns".yellow().bold());
            println!(
                "  Length:   avg {:.2}, min {}, max {}",
                t.avg_length, t.min_length, t.max_length
            );
            println!("  Prefixes: {}", t.common_prefixes.join(", "));
            println!("  Suffixes: {}", t.common_suffixes.join(", "));
        }
        Some(ColumnPatterns::Numeric(n)) => {
            println!();
            println!("{}", "Numeric patterns".yellow().bold());
            println!("  Range:        {} - {}", n.range.min, n.range.max);
            println!("  Quartiles:    Q1 {} / Q3 {}", n.q1, n.q3);
            println!(
                "  Distribution: {} (skewness {:.2})",
                n.distribution.as_str(),
                n.skewness
            );
            let outliers = format!(
                "{} ({:.2}%)",
                n.outliers.count, n.outliers.percentage
            );
            if n.outliers.count > 0 {
                println!("  Outliers:     {}", outliers.red());
            } else {
                println!("  Outliers:     {}", outliers.green());
            }
        }
        None => {
            println!();
            println!("{}", "Column has no non-null values".yellow());
        }
    }

    Ok(())
}
