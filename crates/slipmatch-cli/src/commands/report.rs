//! Rendering of run reports and document diagnostics.

use std::path::Path;

use console::style;

use slipmatch_core::extraction::format_brl_amount;
use slipmatch_core::extraction::tax_ids::format_cnpj;
use slipmatch_core::models::document::DocumentKind;
use slipmatch_core::models::report::{DocumentDiagnostics, RunReport, SlipOutcome};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn render_report(report: &RunReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_slips_csv(&report.slips),
        OutputFormat::Text => Ok(format_report_text(report)),
    }
}

pub fn render_documents(
    documents: &[DocumentDiagnostics],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
        OutputFormat::Csv => format_documents_csv(documents),
        OutputFormat::Text => Ok(format_documents_text(documents)),
    }
}

/// Write one summary row per slip.
pub fn write_summary(path: &Path, slips: &[SlipOutcome]) -> anyhow::Result<()> {
    std::fs::write(path, format_slips_csv(slips)?)?;
    Ok(())
}

fn format_slips_csv(slips: &[SlipOutcome]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["slip", "status", "receipt", "method", "output", "error"])?;

    for slip in slips {
        let status = match (slip.is_matched(), slip.is_merged()) {
            (true, true) => "merged",
            (true, false) => "merge_failed",
            (false, _) => "unmatched",
        };
        wtr.write_record([
            slip.slip.as_str(),
            status,
            slip.receipt.as_deref().unwrap_or(""),
            &slip.method.map(|m| m.to_string()).unwrap_or_default(),
            slip.output.as_deref().unwrap_or(""),
            slip.merge_error.as_deref().unwrap_or(""),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_documents_csv(documents: &[DocumentDiagnostics]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["filename", "kind", "names", "amounts", "tax_ids", "error"])?;

    for doc in documents {
        let amounts: Vec<String> = doc.amounts.iter().map(|a| a.to_string()).collect();
        wtr.write_record([
            doc.filename.as_str(),
            &doc.kind.to_string(),
            &doc.names.join("; "),
            &amounts.join("; "),
            &doc.tax_ids.join("; "),
            doc.text_error.as_deref().unwrap_or(""),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_documents_text(documents: &[DocumentDiagnostics]) -> String {
    let mut output = String::new();

    for doc in documents {
        output.push_str(&format!("{} [{}]\n", doc.filename, doc.kind));
        if let Some(error) = &doc.text_error {
            output.push_str(&format!("  text error: {}\n", error));
        }
        if !doc.kind.is_classified() {
            output.push_str("  ignored\n");
            continue;
        }

        let names: Vec<String> = doc.names.iter().map(|n| format!("{:?}", n)).collect();
        let amounts: Vec<String> = doc.amounts.iter().map(|a| format_brl_amount(*a)).collect();
        let tax_ids: Vec<String> = doc
            .tax_ids
            .iter()
            .map(|id| format_cnpj(id).unwrap_or_else(|| id.clone()))
            .collect();

        output.push_str(&format!("  names:   {}\n", or_none(&names)));
        output.push_str(&format!("  amounts: {}\n", or_none(&amounts)));
        output.push_str(&format!("  CNPJ:    {}\n", or_none(&tax_ids)));
    }

    output
}

fn format_report_text(report: &RunReport) -> String {
    let mut output = format!(
        "{} slips, {} receipts, {} ignored\n\n",
        report.count_kind(DocumentKind::Slip),
        report.count_kind(DocumentKind::Receipt),
        report.count_kind(DocumentKind::Unclassified)
    );
    output.push_str(&format_documents_text(&report.documents));
    output.push('\n');

    for slip in &report.slips {
        match (&slip.receipt, slip.method) {
            (Some(receipt), Some(method)) => {
                let mark = if slip.is_merged() {
                    style("✓").green()
                } else {
                    style("!").yellow()
                };
                output.push_str(&format!("{} {} <- {} ({})\n", mark, slip.slip, receipt, method));
                if let Some(error) = &slip.merge_error {
                    output.push_str(&format!("    merge failed: {}\n", error));
                }
            }
            _ => {
                output.push_str(&format!("{} {}: no receipt found\n", style("✗").red(), slip.slip));
                if let Some(error) = &slip.merge_error {
                    output.push_str(&format!("    {}\n", error));
                }
            }
        }
    }

    output
}

fn or_none(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}
