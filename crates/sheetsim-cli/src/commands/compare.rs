//! Compare command - match a column of one file against a column of another.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use sheetsim::Comparator;
use sheetsim::analysis::SimilarityBucket;

pub struct CompareArgs {
    pub file1: PathBuf,
    pub file2: PathBuf,
    pub column1: String,
    pub column2: String,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub no_profile: bool,
}

pub fn run(args: CompareArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    for file in [&args.file1, &args.file2] {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
    }

    let mut config = super::load_config(args.config.as_deref())?;
    if args.no_profile {
        config.profile_columns = false;
    }

    if !args.json {
        println!(
            "{} {} [{}] {} {} [{}]",
            "Comparing".cyan().bold(),
            args.file1.display().to_string().white(),
            args.column1,
            "with".cyan(),
            args.file2.display().to_string().white(),
            args.column2
        );
    }

    let comparator = Comparator::with_config(config).with_generated_at(Utc::now());
    let result =
        comparator.compare_files(&args.file1, &args.column1, &args.file2, &args.column2)?;

    if let Some(ref path) = args.output {
        fs::write(path, &result.report)?;
    }

    if args.json {
        println!("{}", result.to_json()?);
        return Ok(());
    }

    let a = &result.similarity_analysis;
    println!();
    println!("{}", "Similarity".yellow().bold());
    println!("  Average:  {:.2}%", a.average_score);
    println!("  Median:   {:.2}%", a.median_score);
    println!("  Range:    {:.0}% - {:.0}%", a.min_score, a.max_score);
    println!(
        "  Buckets:  {} high, {} medium, {} low",
        a.high_similarity_count.to_string().green(),
        a.medium_similarity_count.to_string().yellow(),
        a.low_similarity_count.to_string().red()
    );

    println!();
    println!("{}", "Recommendations".yellow().bold());
    for rec in &result.recommendations {
        println!("  {}", rec);
    }

    if verbose {
        println!();
        println!("{}", "Matches".yellow().bold());
        let thresholds = &comparator.config().similarity;
        for (original, detail) in &result.detailed_matches {
            let score = format!("{:>5.1}%", detail.score);
            let score = match thresholds.bucket(detail.score) {
                SimilarityBucket::High => score.green(),
                SimilarityBucket::Medium => score.yellow(),
                SimilarityBucket::Low => score.red(),
            };
            println!("  {} {} -> {}", score, original, detail.matched);
        }
    }

    if let Some(path) = args.output {
        println!();
        println!(
            "{} {}",
            "Report saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}
