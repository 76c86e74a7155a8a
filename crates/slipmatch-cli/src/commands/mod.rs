//! Subcommands and the helpers they share.

pub mod config;
pub mod inspect;
pub mod pair;
pub mod report;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use slipmatch_core::models::config::SlipmatchConfig;
use slipmatch_core::models::document::InputDocument;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slipmatch")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SlipmatchConfig> {
    if let Some(path) = config_path {
        return Ok(SlipmatchConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(SlipmatchConfig::from_file(&default_path)?)
    } else {
        Ok(SlipmatchConfig::default())
    }
}

/// Expand paths and glob patterns into PDF files, keeping argument order.
pub fn collect_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        // Existing paths are taken literally, so `[`, `]` and `*` in file names survive
        let literal = Path::new(pattern);
        if literal.is_file() {
            if is_pdf(literal) {
                files.push(literal.to_path_buf());
            }
            continue;
        }

        let matches: Vec<PathBuf> = glob(pattern)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_pdf(p))
            .collect();
        debug!("{} matched {} files", pattern, matches.len());
        files.extend(matches);
    }

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for: {}", patterns.join(" "));
    }

    Ok(files)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read one input file under its bare filename.
pub async fn read_input(path: &Path) -> anyhow::Result<InputDocument> {
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;
    let data = tokio::fs::read(path).await?;
    Ok(InputDocument::new(filename, data))
}

/// Fail if writing `targets` into `output_dir` would replace one of `inputs`.
///
/// `output_dir` must exist.
pub fn ensure_inputs_preserved(
    inputs: &[PathBuf],
    output_dir: &Path,
    targets: &[&str],
) -> anyhow::Result<()> {
    let inputs: HashSet<PathBuf> = inputs.iter().filter_map(|p| p.canonicalize().ok()).collect();
    let output_dir = output_dir.canonicalize()?;

    for target in targets {
        let path = output_dir.join(target);
        if inputs.contains(&path) {
            anyhow::bail!(
                "Output {} would overwrite an input file; choose another --output-dir",
                path.display()
            );
        }
    }

    Ok(())
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_collect_inputs_takes_existing_paths_literally() {
        let dir = TempDir::new().unwrap();
        let bracketed = dir.path().join("DARF [1].pdf");
        fs::write(&bracketed, b"%PDF").unwrap();

        let files = collect_inputs(&[bracketed.to_string_lossy().into_owned()]).unwrap();
        assert_eq!(files, vec![bracketed]);
    }

    #[test]
    fn test_collect_inputs_skips_literal_non_pdf() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, b"text").unwrap();

        assert!(collect_inputs(&[notes.to_string_lossy().into_owned()]).is_err());
    }

    #[test]
    fn test_outputs_may_not_replace_inputs() {
        let dir = TempDir::new().unwrap();
        let slip = dir.path().join("DARF_A.pdf");
        fs::write(&slip, b"%PDF").unwrap();
        let inputs = vec![slip];

        let err = ensure_inputs_preserved(&inputs, dir.path(), &["report.json", "DARF_A.pdf"])
            .unwrap_err();
        assert!(err.to_string().contains("would overwrite an input file"));

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        assert!(ensure_inputs_preserved(&inputs, &out, &["DARF_A.pdf"]).is_ok());
    }
}
