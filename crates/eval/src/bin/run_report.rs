use anyhow::{Context, Result};
use clap::Parser;
use eval::{Reporter, RunReport, format_percent, generate_plots, render_markdown};
use ingest::DataSource;
use tracing_subscriber::EnvFilter;

/// Score every approach of the evaluation results and write a report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data root: a local directory or an http(s) URL.
    #[arg(long, default_value = ".")]
    data: String,

    /// Results directory, relative to the data root.
    #[arg(long, default_value = "evaluation-results")]
    results_dir: String,

    /// Only score this run.
    #[arg(long)]
    run: Option<String>,

    /// Where report.json, REPORT.md and the plots go.
    #[arg(long, default_value = "report")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let source = if args.data.starts_with("http://") || args.data.starts_with("https://") {
        DataSource::http(&args.data).context("Invalid data URL")?
    } else {
        DataSource::local(&args.data)
    };

    println!("=== Entity Linking Evaluation Report ===\n");
    println!("Data: {}\n", source.describe());

    let reporter = Reporter::new(source, args.results_dir);
    let report = reporter.run_report(args.run.as_deref()).await?;

    print_results(&report);

    std::fs::create_dir_all(&args.output)?;

    let results_json = serde_json::to_string_pretty(&report)?;
    std::fs::write(format!("{}/report.json", args.output), results_json)?;
    println!("\n✅ Results saved to {}/report.json", args.output);

    std::fs::write(format!("{}/REPORT.md", args.output), render_markdown(&report))?;
    println!("✅ Table saved to {}/REPORT.md", args.output);

    generate_plots(&report, &args.output)?;
    println!("✅ Plots saved to {}/", args.output);

    Ok(())
}

fn print_results(report: &RunReport) {
    for r in &report.results {
        println!("📊 {}/{}:", r.run, r.approach);
        println!("  Articles: {}  Cases: {}", r.articles, r.cases);
        println!(
            "  TP: {}  FP: {}  FN: {}",
            r.metrics.true_positives, r.metrics.false_positives, r.metrics.false_negatives
        );
        println!("  Precision: {}", format_percent(r.metrics.precision));
        println!("  Recall:    {}", format_percent(r.metrics.recall));
        println!("  F1:        {}\n", format_percent(r.metrics.f1));
    }

    for failure in &report.failures {
        println!("⚠️  {} skipped: {}", failure.key, failure.error);
    }
}
