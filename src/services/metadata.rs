//! File metadata lookup behind a trait, so intake can be tested without
//! touching the filesystem.

use crate::utils::{self, CompressorResult};
use async_trait::async_trait;

/// Resolves on-disk sizes for intake.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Size of `path` in bytes.
    async fn file_size(&self, path: &str) -> CompressorResult<u64>;
}

/// Production implementation backed by `tokio::fs`.
pub struct FsMetadata;

#[async_trait]
impl MetadataService for FsMetadata {
    async fn file_size(&self, path: &str) -> CompressorResult<u64> {
        utils::file_size(path).await
    }
}
