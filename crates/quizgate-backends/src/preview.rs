//! Preview surface that remembers what it is showing.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use quizgate_core::traits::{CaptureStream, PreviewHandle, PreviewOverlay, PreviewSurface};

/// One mounted preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedPreview {
    pub stream_id: Uuid,
    pub overlay: PreviewOverlay,
}

/// Records mounts and unmounts so callers can check the overlay is torn
/// down with the session.
#[derive(Default)]
pub struct RecordingPreview {
    mounted: Mutex<HashMap<PreviewHandle, MountedPreview>>,
    history: Mutex<Vec<PreviewHandle>>,
}

impl RecordingPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previews currently on screen.
    pub fn visible(&self) -> Vec<MountedPreview> {
        self.mounted.lock().unwrap().values().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.lock().unwrap().is_empty()
    }

    /// Total mounts over the surface's lifetime.
    pub fn mount_count(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

impl PreviewSurface for RecordingPreview {
    fn mount(&self, overlay: &PreviewOverlay, stream: &CaptureStream) -> PreviewHandle {
        let handle = PreviewHandle(Uuid::new_v4());
        self.mounted.lock().unwrap().insert(
            handle,
            MountedPreview {
                stream_id: stream.id,
                overlay: overlay.clone(),
            },
        );
        self.history.lock().unwrap().push(handle);
        tracing::debug!(
            "preview mounted {}x{} at bottom-right",
            overlay.width_px,
            overlay.height_px
        );
        handle
    }

    fn unmount(&self, handle: PreviewHandle) {
        if self.mounted.lock().unwrap().remove(&handle).is_none() {
            tracing::warn!("unmount of unknown preview {}", handle.0);
        }
    }
}
