//! Intake deduplication and metadata resolution.
//!
//! Candidates are deduplicated against the working set and against each
//! other before any metadata is read, so a path can only ever produce one
//! record no matter how often or through which channel it arrives.

use crate::core::types::FileRecord;
use crate::services::MetadataService;
use futures::future::join_all;
use tracing::warn;

use std::collections::HashSet;

/// Filters `candidates` down to paths not yet in `seen`, preserving order.
///
/// `seen` is taken by value and extended as candidates are accepted, which
/// also collapses duplicates within a single batch: the second occurrence
/// of a path finds the first one already recorded.
pub fn surviving_candidates(mut seen: HashSet<String>, candidates: Vec<String>) -> Vec<String> {
    candidates
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .collect()
}

/// Resolves metadata for `paths` concurrently and builds their records.
///
/// A failed lookup degrades that one record to size 0 instead of failing
/// the sweep; the file stays registered and the engine decides later
/// whether it can be read.
pub async fn resolve_records(
    paths: Vec<String>,
    metadata: &dyn MetadataService,
) -> Vec<FileRecord> {
    let lookups = paths.iter().map(|path| metadata.file_size(path));
    let sizes = join_all(lookups).await;

    paths
        .into_iter()
        .zip(sizes)
        .map(|(path, size)| match size {
            Ok(size) => FileRecord::new(path, size),
            Err(e) => {
                warn!("Could not read size of {}: {}", path, e);
                FileRecord::new(path, 0)
            }
        })
        .collect()
}
