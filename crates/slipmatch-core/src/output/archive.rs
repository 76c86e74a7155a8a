//! Zip packaging of merged outputs.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::Archiver;
use crate::error::ArchiveError;

/// Deflate-compressed zip archive writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ZipArchiver {
    fn archive(&self, entries: &[(&str, &[u8])]) -> Result<Vec<u8>, ArchiveError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in entries {
            writer.start_file(*name, options)?;
            writer.write_all(data)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}
