//! Engine request shape and invocation seam.

use crate::core::types::CompressionOptions;
use crate::utils::CompressorResult;
use async_trait::async_trait;
use serde::Serialize;

/// One compression job, serialized verbatim for the engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Source files in registration order.
    pub src_paths: Vec<String>,
    /// Directory receiving every output file.
    pub dest_dir: String,
    pub options: CompressionOptions,
}

/// The external codec engine.
///
/// One call per job; the engine owns per-file concurrency, retries and
/// naming. Implementations return one result line per input file, in input
/// order, or an error when the engine itself could not run.
#[async_trait]
pub trait CompressionEngine: Send + Sync {
    async fn compress_batch(&self, request: &BatchRequest) -> CompressorResult<Vec<String>>;
}
