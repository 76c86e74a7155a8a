//! Pair command - match slips with receipts, merge, and package.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use slipmatch_core::Pipeline;

use super::report::{OutputFormat, render_report, write_summary};
use super::{collect_inputs, ensure_inputs_preserved, load_config, progress_bar, read_input};

/// Arguments for the pair command.
#[derive(Args)]
pub struct PairArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output directory
    #[arg(short, long, default_value = "slipmatch-output")]
    output_dir: PathBuf,

    /// Report format printed to stdout
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also write a per-slip summary CSV
    #[arg(long)]
    summary: bool,
}

pub async fn run(args: PairArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = collect_inputs(&args.inputs)?;
    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    let pipeline = Pipeline::new(&config);

    let pb = progress_bar(files.len());
    let mut records = Vec::with_capacity(files.len());
    for path in &files {
        info!("Reading {}", path.display());
        records.push(pipeline.build_record(read_input(path).await?));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let output = pipeline.finish(&records)?;

    tokio::fs::create_dir_all(&args.output_dir).await?;

    let summary_name = "summary.csv";
    let mut targets = vec![pipeline.archive_name(), config.output.report_name.as_str()];
    if config.output.write_merged {
        targets.extend(output.merged.iter().map(|m| m.filename.as_str()));
    }
    if args.summary {
        targets.push(summary_name);
    }
    ensure_inputs_preserved(&files, &args.output_dir, &targets)?;

    let archive_path = args.output_dir.join(pipeline.archive_name());
    tokio::fs::write(&archive_path, &output.archive).await?;
    debug!("Wrote archive to {}", archive_path.display());

    if config.output.write_merged {
        for merged in &output.merged {
            let merged_path = args.output_dir.join(&merged.filename);
            tokio::fs::write(&merged_path, &merged.data).await?;
            debug!("Wrote merged PDF to {}", merged_path.display());
        }
    }

    let report_path = args.output_dir.join(&config.output.report_name);
    tokio::fs::write(&report_path, serde_json::to_string_pretty(&output.report)?).await?;

    if args.summary {
        let summary_path = args.output_dir.join(summary_name);
        write_summary(&summary_path, &output.report.slips)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!("{}", render_report(&output.report, args.format)?);

    let report = &output.report;
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.documents.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} merged, {} unmatched, {} merge failures",
        style(report.merged_count()).green(),
        style(report.unmatched().count()).yellow(),
        style(report.matched_count() - report.merged_count()).red()
    );
    eprintln!(
        "{} Archive written to {}",
        style("✓").green(),
        archive_path.display()
    );

    Ok(())
}
