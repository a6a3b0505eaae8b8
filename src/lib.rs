// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod services;
pub mod intake;
pub mod processing;
pub mod compressor;
pub mod cli;

// Public exports for external consumers
pub use compressor::Compressor;
pub use core::{
    CompressionOptions, FileRecord, JobPhase, OutputFormat, ResultKind, ResultSummary,
    SUCCESS_MARKER,
};
pub use intake::{DropEvent, DropListener};
pub use processing::{BatchRequest, CompressionEngine, SidecarEngine};
pub use services::{
    default_output_dir, DialogService, FsMetadata, LogNotifier, MetadataService, NativeDialogs,
    Notice, NoticeLevel, Notifier,
};
pub use utils::{CompressorError, CompressorResult};

// This library file is used as a public API for consuming this crate as a library.
// The actual application entry point is in main.rs.
