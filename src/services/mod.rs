pub mod dialog;
pub mod metadata;
pub mod notify;
pub mod system;

pub use dialog::{DialogService, NativeDialogs};
pub use metadata::{FsMetadata, MetadataService};
pub use notify::{LogNotifier, Notice, NoticeLevel, Notifier};
pub use system::default_output_dir;
