//! Result line classification.
//!
//! The engine reports one line of text per input file. The orchestrator
//! stores those lines verbatim and derives outcome counts from a marker
//! prefix; it never parses the rest of the line.

/// Prefix the engine puts on every successful result line.
///
/// This is a byte-for-byte contract with the engine. Any line not starting
/// with it counts as a failure, including the synthetic transport-error
/// line.
pub const SUCCESS_MARKER: &str = "成功";

/// Outcome of a single result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Failure,
}

/// Classifies one result line by its marker prefix.
pub fn classify(line: &str) -> ResultKind {
    if line.starts_with(SUCCESS_MARKER) {
        ResultKind::Success
    } else {
        ResultKind::Failure
    }
}

/// Aggregate counts over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultSummary {
    pub success: usize,
    pub failure: usize,
}

impl ResultSummary {
    pub fn total(&self) -> usize {
        self.success + self.failure
    }
}

/// Counts successes and failures across `lines`.
pub fn summarize(lines: &[String]) -> ResultSummary {
    let mut summary = ResultSummary::default();
    for line in lines {
        match classify(line) {
            ResultKind::Success => summary.success += 1,
            ResultKind::Failure => summary.failure += 1,
        }
    }
    summary
}
