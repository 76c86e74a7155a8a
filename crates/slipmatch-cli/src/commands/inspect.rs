//! Inspect command - show extracted fields without pairing.

use clap::Args;

use slipmatch_core::Pipeline;
use slipmatch_core::models::report::DocumentDiagnostics;

use super::report::{OutputFormat, render_documents};
use super::{collect_inputs, load_config, progress_bar, read_input};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let files = collect_inputs(&args.inputs)?;
    let pipeline = Pipeline::new(&config);

    let pb = progress_bar(files.len());
    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        let record = pipeline.build_record(read_input(path).await?);
        documents.push(DocumentDiagnostics::from(&record));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{}", render_documents(&documents, args.format)?);
    Ok(())
}
