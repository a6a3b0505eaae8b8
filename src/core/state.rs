//! Shared session state and the single-slot job guard.
//!
//! All orchestrator operations funnel through one [`SessionState`]. The
//! phase field is the concurrency primitive: an operation claims the slot
//! with a compare-and-swap, and a held [`PhaseGuard`] restores `Idle` on
//! every exit path, panics included.

use crate::core::types::{CompressionOptions, FileRecord};
use crate::utils::{CompressorError, CompressorResult};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Mutex;

/// Lifecycle phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum JobPhase {
    /// No operation in flight; the slot is free.
    Idle = 0,
    /// An intake sweep is resolving file metadata.
    Loading = 1,
    /// A compression job is running against the engine.
    Compressing = 2,
}

impl JobPhase {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => JobPhase::Loading,
            2 => JobPhase::Compressing,
            _ => JobPhase::Idle,
        }
    }
}

/// State shared by every orchestrator operation.
#[derive(Debug)]
pub struct SessionState {
    phase: AtomicU8,
    progress: AtomicU8,
    files: Mutex<Vec<FileRecord>>,
    output_dir: Mutex<String>,
    options: Mutex<CompressionOptions>,
    results: Mutex<Vec<String>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(JobPhase::Idle as u8),
            progress: AtomicU8::new(0),
            files: Mutex::new(Vec::new()),
            output_dir: Mutex::new(String::new()),
            options: Mutex::new(CompressionOptions::default()),
            results: Mutex::new(Vec::new()),
        }
    }

    /// Claims the job slot for `phase`.
    ///
    /// Exactly one claim can be outstanding; a second caller gets a `Busy`
    /// error and must not mutate anything. The returned guard releases the
    /// slot when dropped.
    pub fn try_begin(&self, phase: JobPhase) -> CompressorResult<PhaseGuard<'_>> {
        let claimed = self.phase.compare_exchange(
            JobPhase::Idle as u8,
            phase as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        match claimed {
            Ok(_) => Ok(PhaseGuard { state: self, phase }),
            Err(_) => Err(CompressorError::busy(
                "another operation is already in progress, try again shortly",
            )),
        }
    }

    /// Current phase, for display only. May be stale by the time the caller
    /// acts on it; mutation decisions go through [`Self::try_begin`].
    pub fn phase(&self) -> JobPhase {
        JobPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Current progress value, 0 or 100.
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    pub fn set_progress(&self, value: u8) {
        self.progress.store(value, Ordering::Release);
    }

    /// Snapshot of the working set in registration order.
    pub async fn files(&self) -> Vec<FileRecord> {
        self.files.lock().await.clone()
    }

    pub async fn file_count(&self) -> usize {
        self.files.lock().await.len()
    }

    /// Paths already registered, for intake dedup.
    pub async fn path_set(&self) -> HashSet<String> {
        self.files
            .lock()
            .await
            .iter()
            .map(|record| record.path.clone())
            .collect()
    }

    /// Appends records preserving their order.
    pub async fn append_records(&self, records: Vec<FileRecord>) {
        self.files.lock().await.extend(records);
    }

    /// Removes the record at `index`, or `None` when out of range.
    pub async fn remove_file(&self, index: usize) -> Option<FileRecord> {
        let mut files = self.files.lock().await;
        if index < files.len() {
            Some(files.remove(index))
        } else {
            None
        }
    }

    pub async fn clear_files(&self) {
        self.files.lock().await.clear();
    }

    pub async fn output_dir(&self) -> String {
        self.output_dir.lock().await.clone()
    }

    pub async fn set_output_dir(&self, dir: String) {
        *self.output_dir.lock().await = dir;
    }

    pub async fn options(&self) -> CompressionOptions {
        self.options.lock().await.clone()
    }

    pub async fn set_options(&self, options: CompressionOptions) {
        *self.options.lock().await = options;
    }

    /// Result lines from the most recent job.
    pub async fn results(&self) -> Vec<String> {
        self.results.lock().await.clone()
    }

    /// Replaces the result lines wholesale. Results never accumulate
    /// across jobs.
    pub async fn set_results(&self, lines: Vec<String>) {
        *self.results.lock().await = lines;
    }

    pub async fn clear_results(&self) {
        self.results.lock().await.clear();
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the job slot on drop.
///
/// A guard taken for `Compressing` also forces progress to 100 before the
/// slot opens, so observers never see a finished job stuck mid-bar. The
/// store order matters: progress first, then phase, otherwise a job that
/// starts immediately after release could have its fresh 0 overwritten.
#[derive(Debug)]
pub struct PhaseGuard<'a> {
    state: &'a SessionState,
    phase: JobPhase,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if self.phase == JobPhase::Compressing {
            self.state.set_progress(100);
        }
        self.state.phase.store(JobPhase::Idle as u8, Ordering::Release);
    }
}
