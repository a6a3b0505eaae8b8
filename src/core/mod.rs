pub mod results;
pub mod state;
pub mod types;

pub use results::{classify, summarize, ResultKind, ResultSummary, SUCCESS_MARKER};
pub use state::{JobPhase, PhaseGuard, SessionState};
pub use types::{CompressionOptions, FileRecord, OutputFormat};
