//! Configuration structures for a pairing run.

use serde::{Deserialize, Serialize};

/// Main configuration for the slipmatch pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipmatchConfig {
    /// Filename classification markers.
    pub classifier: ClassifierConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Pairing configuration.
    pub pairing: PairingConfig,

    /// Output naming and packaging.
    pub output: OutputConfig,
}

/// Filename markers used to classify documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Case-sensitive substring marking a payment slip.
    pub slip_marker: String,

    /// Case-sensitive substring marking a payment receipt.
    pub receipt_marker: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            slip_marker: "DARF".to_string(),
            receipt_marker: "Comprovante".to_string(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strip surrounding whitespace from captured names.
    /// Off by default: names are compared verbatim.
    pub trim_names: bool,
}

/// Pairing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Run a CNPJ+value pass between the name+value and value-only passes.
    pub identifier_pass: bool,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the zip archive holding every merged PDF.
    pub archive_name: String,

    /// Also write each merged PDF next to the archive.
    pub write_merged: bool,

    /// File name of the JSON run report written to the output directory.
    pub report_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            archive_name: "darfs_agrupados.zip".to_string(),
            write_merged: true,
            report_name: "report.json".to_string(),
        }
    }
}

impl SlipmatchConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SlipmatchConfig =
            serde_json::from_str(r#"{"pairing": {"identifier_pass": true}}"#).unwrap();

        assert!(config.pairing.identifier_pass);
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.output.archive_name, "darfs_agrupados.zip");
        assert!(!config.extraction.trim_names);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut config = SlipmatchConfig::default();
        config.classifier.slip_marker = "GUIA".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: SlipmatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
