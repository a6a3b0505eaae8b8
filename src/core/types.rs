//! Core data types shared across the orchestrator.

use crate::utils::{file_name_of, CompressorError, CompressorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target format the engine encodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    Png,
    Webp,
}

impl OutputFormat {
    /// File extension used for the encoded output.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            other => Err(CompressorError::validation(format!(
                "Unsupported output format: {}",
                other
            ))),
        }
    }
}

/// Encoding parameters forwarded to the engine verbatim.
///
/// Optional knobs are omitted from the serialized request when unset so the
/// engine applies its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionOptions {
    pub format: OutputFormat,
    pub quality: u8,
    /// WebP alpha channel quality (1-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_quality: Option<u8>,
    /// PNG row filter strategy (0-5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<u8>,
    /// PNG zlib compression level (0-9).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u8>,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: 80,
            alpha_quality: None,
            filter: None,
            compression: None,
        }
    }
}

impl CompressionOptions {
    /// Checks every knob against its accepted range.
    pub fn validate(&self) -> CompressorResult<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(CompressorError::validation(format!(
                "Quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        if let Some(alpha) = self.alpha_quality {
            if !(1..=100).contains(&alpha) {
                return Err(CompressorError::validation(format!(
                    "Alpha quality must be between 1 and 100, got {}",
                    alpha
                )));
            }
        }
        if let Some(filter) = self.filter {
            if filter > 5 {
                return Err(CompressorError::validation(format!(
                    "Filter must be between 0 and 5, got {}",
                    filter
                )));
            }
        }
        if let Some(compression) = self.compression {
            if compression > 9 {
                return Err(CompressorError::validation(format!(
                    "Compression level must be between 0 and 9, got {}",
                    compression
                )));
            }
        }
        Ok(())
    }
}

/// A file accepted into the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Final path component, kept for display.
    pub name: String,
    /// Absolute path as supplied at intake. Identity key for dedup.
    pub path: String,
    /// Size in bytes; 0 when metadata could not be read.
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
            size,
        }
    }
}
