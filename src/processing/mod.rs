pub(crate) mod dispatcher;
pub mod engine;
pub mod sidecar;

pub use engine::{BatchRequest, CompressionEngine};
pub use sidecar::SidecarEngine;
