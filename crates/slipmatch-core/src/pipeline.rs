//! One processing run: classify, extract, pair, merge, package.

use chrono::Utc;
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::error::Result;
use crate::extraction::FieldExtractor;
use crate::models::config::SlipmatchConfig;
use crate::models::document::{DocumentRecord, InputDocument};
use crate::models::report::{DocumentDiagnostics, RunReport, SlipOutcome};
use crate::output::{Archiver, MergedOutput, OutputAssembler, ZipArchiver};
use crate::pairing::PairingEngine;
use crate::pdf::{DocumentMerger, LopdfMerger, PdfExtractor, TextExtractor};

/// Everything a run hands back to the driving interface.
#[derive(Debug)]
pub struct RunOutput {
    pub report: RunReport,
    /// Merged PDFs, in slip order.
    pub merged: Vec<MergedOutput>,
    /// Zip archive containing every merged PDF.
    pub archive: Vec<u8>,
}

/// Processing pipeline wired to its text, merge, and archive collaborators.
pub struct Pipeline<E = PdfExtractor, M = LopdfMerger, A = ZipArchiver> {
    classifier: Classifier,
    fields: FieldExtractor,
    engine: PairingEngine,
    text: E,
    assembler: OutputAssembler<M>,
    archiver: A,
    archive_name: String,
}

impl Pipeline {
    /// Pipeline using the lopdf / pdf-extract / zip collaborators.
    pub fn new(config: &SlipmatchConfig) -> Self {
        Self::with_collaborators(config, PdfExtractor::new(), LopdfMerger::new(), ZipArchiver::new())
    }
}

impl<E: TextExtractor, M: DocumentMerger, A: Archiver> Pipeline<E, M, A> {
    pub fn with_collaborators(config: &SlipmatchConfig, text: E, merger: M, archiver: A) -> Self {
        Self {
            classifier: Classifier::from_config(&config.classifier),
            fields: FieldExtractor::from_config(&config.extraction),
            engine: PairingEngine::from_config(&config.pairing),
            text,
            assembler: OutputAssembler::new(merger),
            archiver,
            archive_name: config.output.archive_name.clone(),
        }
    }

    /// Classify one input and extract its fields.
    ///
    /// Unreadable text is recorded on the record and leaves its fields empty.
    pub fn build_record(&self, input: InputDocument) -> DocumentRecord {
        let kind = self.classifier.classify(&input.filename);
        let mut record = DocumentRecord::new(input.filename, input.data, kind);

        if !kind.is_classified() {
            return record;
        }

        match self.text.extract_text(&record.content) {
            Ok(text) => self.fields.populate(&mut record, &text),
            Err(e) => {
                warn!("Failed to read text from {}: {}", record.filename, e);
                record.text_error = Some(e.to_string());
            }
        }

        record
    }

    /// Classification and extraction only.
    pub fn inspect(&self, inputs: Vec<InputDocument>) -> Vec<DocumentRecord> {
        inputs.into_iter().map(|input| self.build_record(input)).collect()
    }

    /// Run the whole pipeline over `inputs`, in input order.
    pub fn run(&self, inputs: Vec<InputDocument>) -> Result<RunOutput> {
        let records = self.inspect(inputs);
        self.finish(&records)
    }

    /// Pair already-built records, merge the pairs, and package them.
    pub fn finish(&self, records: &[DocumentRecord]) -> Result<RunOutput> {
        let pairing = self.engine.pair(records);
        let assembled = self.assembler.assemble(&pairing);
        let archive = self.assembler.package(&self.archiver, &assembled.merged)?;

        let mut slips = Vec::new();
        for slip in records.iter().filter(|r| r.is_slip()) {
            let outcome = match pairing.matches.get(&slip.filename) {
                Some(m) if std::ptr::eq(m.slip, slip) => {
                    let failure = assembled.failures.iter().find(|f| f.filename == slip.filename);
                    SlipOutcome {
                        slip: slip.filename.clone(),
                        receipt: Some(m.receipt.filename.clone()),
                        method: Some(m.method),
                        output: failure.is_none().then(|| slip.filename.clone()),
                        merge_error: failure.map(|f| f.error.to_string()),
                    }
                }
                Some(_) => {
                    warn!("{} appears more than once; only the last occurrence is merged", slip.filename);
                    SlipOutcome {
                        merge_error: Some("superseded by a later slip with the same filename".to_string()),
                        ..SlipOutcome::unmatched(&slip.filename)
                    }
                }
                None => SlipOutcome::unmatched(&slip.filename),
            };
            slips.push(outcome);
        }

        let report = RunReport {
            generated_at: Utc::now(),
            documents: records.iter().map(DocumentDiagnostics::from).collect(),
            slips,
            archive_name: Some(self.archive_name.clone()),
        };

        info!(
            "Run complete: {} documents, {} slips matched, {} merged",
            report.documents.len(),
            report.matched_count(),
            report.merged_count()
        );

        Ok(RunOutput {
            report,
            merged: assembled.merged,
            archive,
        })
    }

    pub fn archive_name(&self) -> &str {
        &self.archive_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MergeError, PdfError};
    use crate::models::document::DocumentKind;
    use crate::models::report::MatchMethod;
    use crate::pdf;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    /// Treats file bytes as UTF-8 text; `FAIL` bytes fail extraction.
    struct PlainText;

    impl TextExtractor for PlainText {
        fn extract_text(&self, data: &[u8]) -> pdf::Result<String> {
            if data == b"FAIL" {
                return Err(PdfError::TextExtraction("unreadable".to_string()));
            }
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }

    /// Joins inputs with a `|` marker.
    struct JoinMerger;

    impl DocumentMerger for JoinMerger {
        fn merge(&self, documents: &[(&str, &[u8])]) -> std::result::Result<Vec<u8>, MergeError> {
            let parts: Vec<&[u8]> = documents.iter().map(|(_, data)| *data).collect();
            Ok(parts.join(&b'|'))
        }
    }

    fn pipeline() -> Pipeline<PlainText, JoinMerger, ZipArchiver> {
        Pipeline::with_collaborators(&SlipmatchConfig::default(), PlainText, JoinMerger, ZipArchiver)
    }

    const SLIP_TEXT: &str = "Parceiro : Acme Ltda 123\nVl.Recolhe : 1.234,56\n";
    const RECEIPT_TEXT: &str = "Nome: Acme Ltda\nVALOR DO PRINCIPAL R$ 1.234,56\n";

    #[test]
    fn test_end_to_end_pair() {
        let inputs = vec![
            InputDocument::new("DARF_A.pdf", SLIP_TEXT),
            InputDocument::new("Comprovante_A.pdf", RECEIPT_TEXT),
        ];

        let output = pipeline().run(inputs).unwrap();

        assert_eq!(output.merged.len(), 1);
        let merged = &output.merged[0];
        assert_eq!(merged.filename, "DARF_A.pdf");
        assert_eq!(merged.receipt, "Comprovante_A.pdf");
        assert_eq!(merged.data, format!("{SLIP_TEXT}|{RECEIPT_TEXT}").into_bytes());

        let mut archive = zip::ZipArchive::new(Cursor::new(output.archive)).unwrap();
        assert_eq!(archive.len(), 1);
        let mut content = Vec::new();
        archive.by_name("DARF_A.pdf").unwrap().read_to_end(&mut content).unwrap();
        assert_eq!(content, merged.data);

        assert_eq!(output.report.slips.len(), 1);
        assert_eq!(output.report.slips[0].output.as_deref(), Some("DARF_A.pdf"));
    }

    #[test]
    fn test_verbatim_names_fall_back_to_value_only() {
        let inputs = vec![
            InputDocument::new("DARF_A.pdf", SLIP_TEXT),
            InputDocument::new("Comprovante_A.pdf", RECEIPT_TEXT),
        ];

        let output = pipeline().run(inputs).unwrap();
        assert_eq!(output.merged[0].method, MatchMethod::ValueOnly);
    }

    #[test]
    fn test_trimmed_names_match_by_name() {
        let mut config = SlipmatchConfig::default();
        config.extraction.trim_names = true;
        let pipeline = Pipeline::with_collaborators(&config, PlainText, JoinMerger, ZipArchiver);

        let inputs = vec![
            InputDocument::new("DARF_A.pdf", SLIP_TEXT),
            InputDocument::new("Comprovante_A.pdf", RECEIPT_TEXT),
        ];

        let output = pipeline.run(inputs).unwrap();
        assert_eq!(output.merged[0].method, MatchMethod::NameAndValue);
    }

    #[test]
    fn test_extraction_failure_is_isolated() {
        let inputs = vec![
            InputDocument::new("DARF_A.pdf", "FAIL"),
            InputDocument::new("DARF_B.pdf", "Vl.Recolhe : 10,00"),
            InputDocument::new("Comprovante_B.pdf", "VALOR TOTAL R$ 10,00"),
            InputDocument::new("notes.pdf", "Vl.Recolhe : 10,00"),
        ];

        let output = pipeline().run(inputs).unwrap();
        let report = &output.report;

        assert_eq!(report.documents.len(), 4);
        assert!(report.documents[0].text_error.is_some());
        assert!(report.documents[0].amounts.is_empty());
        assert_eq!(report.documents[3].kind, DocumentKind::Unclassified);
        assert!(report.documents[3].amounts.is_empty());

        assert_eq!(report.slips.len(), 2);
        assert!(!report.slips[0].is_matched());
        assert_eq!(report.slips[1].receipt.as_deref(), Some("Comprovante_B.pdf"));
        assert_eq!(output.merged.len(), 1);
    }

    #[test]
    fn test_no_matches_still_produces_archive() {
        let inputs = vec![InputDocument::new("DARF_A.pdf", "Vl.Recolhe : 10,00")];

        let output = pipeline().run(inputs).unwrap();

        assert!(output.merged.is_empty());
        assert_eq!(output.report.unmatched().count(), 1);
        let archive = zip::ZipArchive::new(Cursor::new(output.archive)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_unclassified_text_is_never_read() {
        let records = pipeline().inspect(vec![InputDocument::new("readme.pdf", "FAIL")]);
        assert_eq!(records[0].kind, DocumentKind::Unclassified);
        assert!(records[0].text_error.is_none());
    }
}
