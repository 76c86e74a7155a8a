//! Filename-based document classification.

use crate::models::config::ClassifierConfig;
use crate::models::document::DocumentKind;

/// Classifies documents by case-sensitive filename markers.
///
/// The slip marker is checked first, so a filename carrying both markers
/// is a slip.
#[derive(Debug, Clone)]
pub struct Classifier {
    slip_marker: String,
    receipt_marker: String,
}

impl Classifier {
    pub fn new(slip_marker: impl Into<String>, receipt_marker: impl Into<String>) -> Self {
        Self {
            slip_marker: slip_marker.into(),
            receipt_marker: receipt_marker.into(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.slip_marker, &config.receipt_marker)
    }

    pub fn classify(&self, filename: &str) -> DocumentKind {
        if !self.slip_marker.is_empty() && filename.contains(&self.slip_marker) {
            DocumentKind::Slip
        } else if !self.receipt_marker.is_empty() && filename.contains(&self.receipt_marker) {
            DocumentKind::Receipt
        } else {
            DocumentKind::Unclassified
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

/// Classify a filename with the default `DARF` / `Comprovante` markers.
pub fn classify(filename: &str) -> DocumentKind {
    Classifier::default().classify(filename)
}
