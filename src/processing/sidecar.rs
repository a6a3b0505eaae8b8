//! Child-process engine invocation.
//!
//! The production engine is a separate executable. Each job is one
//! invocation: the request travels as a JSON argument, result lines come
//! back as a JSON array on stdout, and a non-zero exit or unreadable
//! output is an engine error.

use super::engine::{BatchRequest, CompressionEngine};
use crate::utils::{CompressorError, CompressorResult};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Engine adapter spawning an external program per job.
pub struct SidecarEngine {
    program: String,
}

impl SidecarEngine {
    /// `program` is resolved through `PATH` like any spawned command.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl CompressionEngine for SidecarEngine {
    async fn compress_batch(&self, request: &BatchRequest) -> CompressorResult<Vec<String>> {
        let payload = serde_json::to_string(request).map_err(|e| {
            CompressorError::engine(format!("Failed to encode batch request: {}", e))
        })?;

        debug!(
            "Invoking {} for {} file(s)",
            self.program,
            request.src_paths.len()
        );

        let output = Command::new(&self.program)
            .arg("compress-batch")
            .arg(&payload)
            .output()
            .await
            .map_err(|e| {
                CompressorError::engine(format!("Failed to start {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompressorError::engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(stdout.trim())
            .map_err(|e| CompressorError::engine(format!("Unreadable engine output: {}", e)))
    }
}
