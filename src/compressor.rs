//! Session facade.
//!
//! One [`Compressor`] owns the working set, the options, the engine handle
//! and the service seams. Every operation the CLI or the drop listener can
//! trigger goes through here.

use crate::core::results::{self, ResultSummary};
use crate::core::state::{JobPhase, SessionState};
use crate::core::types::{CompressionOptions, FileRecord};
use crate::intake::dedupe;
use crate::processing::dispatcher;
use crate::processing::engine::CompressionEngine;
use crate::services::{DialogService, FsMetadata, MetadataService, NativeDialogs};
use crate::utils::CompressorResult;
use std::sync::Arc;
use tracing::debug;

/// Batch compression session.
pub struct Compressor {
    state: SessionState,
    engine: Arc<dyn CompressionEngine>,
    metadata: Arc<dyn MetadataService>,
    dialogs: Arc<dyn DialogService>,
}

impl Compressor {
    /// Creates a session with the production metadata and dialog services.
    pub fn new(engine: Arc<dyn CompressionEngine>) -> Self {
        Self::with_services(engine, Arc::new(FsMetadata), Arc::new(NativeDialogs))
    }

    /// Creates a session with explicit service implementations.
    pub fn with_services(
        engine: Arc<dyn CompressionEngine>,
        metadata: Arc<dyn MetadataService>,
        dialogs: Arc<dyn DialogService>,
    ) -> Self {
        Self {
            state: SessionState::new(),
            engine,
            metadata,
            dialogs,
        }
    }

    /// Registers `paths` into the working set.
    ///
    /// Claims the job slot for the whole sweep; a concurrent sweep or job
    /// gets a `Busy` error and registers nothing. Paths already present
    /// are skipped silently, and a path whose metadata cannot be read is
    /// kept with size 0.
    ///
    /// # Returns
    /// The number of records actually added.
    pub async fn register_paths(&self, paths: Vec<String>) -> CompressorResult<usize> {
        let _guard = self.state.try_begin(JobPhase::Loading)?;

        let seen = self.state.path_set().await;
        let surviving = dedupe::surviving_candidates(seen, paths);
        if surviving.is_empty() {
            return Ok(0);
        }

        let records = dedupe::resolve_records(surviving, self.metadata.as_ref()).await;
        let added = records.len();
        self.state.append_records(records).await;
        debug!("Registered {} new file(s)", added);
        Ok(added)
    }

    /// Opens the image picker and registers whatever the user chose.
    ///
    /// A cancelled dialog registers nothing and is not an error. Picked
    /// paths skip the extension check; the dialog filter already
    /// constrains them.
    pub async fn select_files(&self) -> CompressorResult<usize> {
        match self.dialogs.pick_images().await {
            Some(paths) => self.register_paths(paths).await,
            None => Ok(0),
        }
    }

    /// Opens the directory picker and stores the choice as output
    /// directory. `None` when the user cancels; the previous directory
    /// then stays in place.
    pub async fn select_output_dir(&self) -> Option<String> {
        let dir = self.dialogs.pick_directory().await?;
        self.state.set_output_dir(dir.clone()).await;
        Some(dir)
    }

    pub async fn set_output_dir(&self, dir: impl Into<String>) {
        self.state.set_output_dir(dir.into()).await;
    }

    /// Replaces the encoding options after validating them.
    pub async fn set_options(&self, options: CompressionOptions) -> CompressorResult<()> {
        options.validate()?;
        self.state.set_options(options).await;
        Ok(())
    }

    /// Compresses the current working set in one engine call.
    ///
    /// # Returns
    /// Success and failure counts for the stored result lines. The lines
    /// themselves are available through [`Self::results`].
    pub async fn compress(&self) -> CompressorResult<ResultSummary> {
        dispatcher::dispatch(&self.state, self.engine.as_ref()).await
    }

    /// Removes the file at `index`, or `None` when out of range.
    pub async fn remove_file(&self, index: usize) -> Option<FileRecord> {
        self.state.remove_file(index).await
    }

    /// Empties the working set and previous results.
    pub async fn clear(&self) {
        self.state.clear_files().await;
        self.state.clear_results().await;
        self.state.set_progress(0);
    }

    pub async fn files(&self) -> Vec<FileRecord> {
        self.state.files().await
    }

    pub async fn file_count(&self) -> usize {
        self.state.file_count().await
    }

    pub async fn output_dir(&self) -> String {
        self.state.output_dir().await
    }

    pub async fn options(&self) -> CompressionOptions {
        self.state.options().await
    }

    pub async fn results(&self) -> Vec<String> {
        self.state.results().await
    }

    /// Counts derived from the stored result lines.
    pub async fn summary(&self) -> ResultSummary {
        results::summarize(&self.state.results().await)
    }

    pub fn phase(&self) -> JobPhase {
        self.state.phase()
    }

    pub fn progress(&self) -> u8 {
        self.state.progress()
    }
}
