//! Job composition and dispatch.
//!
//! Owns the compression flow: validate, claim the job slot, compose the
//! request from a snapshot of session state, call the engine once, store
//! the result lines. Progress is binary and the guard forces it to 100 on
//! every exit from the job, error paths included.

use crate::core::results::{self, ResultSummary};
use crate::core::state::{JobPhase, SessionState};
use crate::processing::engine::{BatchRequest, CompressionEngine};
use crate::utils::{CompressorError, CompressorResult};
use tracing::{debug, warn};

/// Runs one compression job over the current working set.
pub(crate) async fn dispatch(
    state: &SessionState,
    engine: &dyn CompressionEngine,
) -> CompressorResult<ResultSummary> {
    // Snapshot before claiming the slot. Validation failures must leave
    // the session untouched, including progress.
    let files = state.files().await;
    let dest_dir = state.output_dir().await;

    if files.is_empty() {
        return Err(CompressorError::validation(
            "no files selected, add images before compressing",
        ));
    }
    if dest_dir.is_empty() {
        return Err(CompressorError::validation("no output directory selected"));
    }

    let _guard = state.try_begin(JobPhase::Compressing)?;
    state.set_progress(0);
    state.clear_results().await;

    let request = BatchRequest {
        src_paths: files.into_iter().map(|record| record.path).collect(),
        dest_dir,
        options: state.options().await,
    };

    debug!(
        "Dispatching {} file(s) to the engine",
        request.src_paths.len()
    );

    let lines = match engine.compress_batch(&request).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Engine call failed: {}", e);
            // The whole batch collapses into a single failure line; the
            // marker check classifies it as such.
            vec![format!("错误: {}", e)]
        }
    };

    let summary = results::summarize(&lines);
    state.set_results(lines).await;
    Ok(summary)
}
