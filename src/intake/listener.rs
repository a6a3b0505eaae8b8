//! Background drag-and-drop subscription.
//!
//! Drop events arrive on a channel and feed the same registration path as
//! explicit selection. The subscription lives in a spawned task owned by a
//! [`DropListener`] handle; releasing the handle stops the subscription.

use crate::compressor::Compressor;
use crate::services::{Notice, Notifier};
use crate::utils::is_supported_image;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// One drag-and-drop gesture, carrying every path it contained.
#[derive(Debug, Clone)]
pub struct DropEvent {
    pub paths: Vec<String>,
}

/// Handle owning the drop subscription task.
pub struct DropListener {
    task: Option<JoinHandle<()>>,
}

impl DropListener {
    /// Spawns the subscription, feeding accepted drops into `compressor`.
    ///
    /// A drop event is all-or-nothing: if any path has an unsupported
    /// extension the whole event is rejected with a single notice and no
    /// file from it is registered.
    pub fn bind(
        compressor: Arc<Compressor>,
        mut events: mpsc::Receiver<DropEvent>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                debug!("Drop event with {} path(s)", event.paths.len());

                if !event.paths.iter().all(|path| is_supported_image(path)) {
                    notifier.notify(Notice::error(
                        "only png, jpg, jpeg and webp images are supported",
                    ));
                    continue;
                }

                if let Err(e) = compressor.register_paths(event.paths).await {
                    notifier.notify(Notice::error(e.to_string()));
                }
            }
        });

        Self { task: Some(task) }
    }

    /// Stops the subscription and waits for the task to wind down.
    pub async fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for DropListener {
    fn drop(&mut self) {
        // Backstop for handles that were never explicitly closed.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
