//! Native file picker dialogs.
//!
//! Wrapped in a trait so the orchestrator can run headless in tests. Both
//! operations distinguish "user cancelled" (`None`) from an empty choice;
//! a cancelled dialog is not an error and must not disturb session state.

use crate::utils::ALLOWED_INPUT_EXTENSIONS;
use async_trait::async_trait;

/// System dialogs for choosing inputs and the destination directory.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Opens a multi-select image picker. `None` when the user cancels.
    async fn pick_images(&self) -> Option<Vec<String>>;

    /// Opens a directory picker. `None` when the user cancels.
    async fn pick_directory(&self) -> Option<String>;
}

/// Production implementation backed by `rfd`.
pub struct NativeDialogs;

#[async_trait]
impl DialogService for NativeDialogs {
    async fn pick_images(&self) -> Option<Vec<String>> {
        let picked = rfd::AsyncFileDialog::new()
            .add_filter("Images", &ALLOWED_INPUT_EXTENSIONS)
            .pick_files()
            .await?;
        Some(
            picked
                .iter()
                .map(|handle| handle.path().to_string_lossy().into_owned())
                .collect(),
        )
    }

    async fn pick_directory(&self) -> Option<String> {
        let picked = rfd::AsyncFileDialog::new().pick_folder().await?;
        Some(picked.path().to_string_lossy().into_owned())
    }
}
