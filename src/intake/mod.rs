pub mod dedupe;
pub mod listener;

pub use dedupe::{resolve_records, surviving_candidates};
pub use listener::{DropEvent, DropListener};
