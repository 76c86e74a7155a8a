//! Data models for documents, configuration, and run reports.

pub mod config;
pub mod document;
pub mod report;
