//! Collaborator trait definitions.
//!
//! The engine never talks to a camera, a user directory, or storage
//! directly. It goes through these traits, which the `quizgate-backends`
//! crate implements in memory.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CaptureError, Result};
use crate::model::{AssessmentDefinition, User};

// ---------------------------------------------------------------------------
// Capture device
// ---------------------------------------------------------------------------

/// A video capture device that must be held for the whole proctored session.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Human-readable device name (e.g. "front camera").
    fn name(&self) -> &str;

    /// Ask for exclusive access. May suspend while the user answers a
    /// permission prompt.
    async fn request_video_capture(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<CaptureStream, CaptureError>;

    /// Stop every track of `stream` and give the device back.
    fn release_stream(&self, stream: CaptureStream);
}

/// Which tracks a capture request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
}

impl CaptureConstraints {
    /// Proctoring needs the camera only.
    pub fn video_only() -> Self {
        Self {
            video: true,
            audio: false,
        }
    }
}

/// A granted capture stream. Not `Clone`: whoever holds it must release it.
#[derive(Debug, PartialEq, Eq)]
pub struct CaptureStream {
    pub id: Uuid,
    pub device_label: String,
}

impl CaptureStream {
    pub fn new(device_label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_label: device_label.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Preview surface
// ---------------------------------------------------------------------------

/// Where the live camera preview is shown while an attempt is in progress.
pub trait PreviewSurface: Send + Sync {
    fn mount(&self, overlay: &PreviewOverlay, stream: &CaptureStream) -> PreviewHandle;
    fn unmount(&self, handle: PreviewHandle);
}

/// Opaque handle to a mounted preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewHandle(pub Uuid);

/// Geometry of the preview overlay: fixed, bottom-right, non-blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewOverlay {
    pub bottom_px: u32,
    pub right_px: u32,
    pub width_px: u32,
    pub height_px: u32,
    pub border_px: u32,
    pub border_color: String,
    pub border_radius_px: u32,
    pub z_index: u32,
    pub muted: bool,
}

impl Default for PreviewOverlay {
    fn default() -> Self {
        Self {
            bottom_px: 12,
            right_px: 12,
            width_px: 180,
            height_px: 120,
            border_px: 3,
            border_color: "#A4DD00".to_string(),
            border_radius_px: 8,
            z_index: 99_999,
            muted: true,
        }
    }
}

/// Preview surface that shows nothing.
pub struct NoopPreview;

impl PreviewSurface for NoopPreview {
    fn mount(&self, _: &PreviewOverlay, _: &CaptureStream) -> PreviewHandle {
        PreviewHandle(Uuid::nil())
    }
    fn unmount(&self, _: PreviewHandle) {}
}

// ---------------------------------------------------------------------------
// Directory, catalog, storage
// ---------------------------------------------------------------------------

/// Authentication/session collaborator.
pub trait UserDirectory: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<User>;
}

/// Catalog collaborator owning assessment definitions.
pub trait AssessmentCatalog: Send + Sync {
    fn get_assessment(&self, id: &str) -> Result<Option<AssessmentDefinition>>;
    fn list_assessments(&self) -> Result<Vec<AssessmentDefinition>>;
    /// Add a definition at the front of the catalog.
    fn insert(&self, definition: AssessmentDefinition) -> Result<()>;
    /// Remove a definition. Returns `false` if it did not exist.
    fn remove(&self, id: &str) -> Result<bool>;
}

/// Durable collection collaborator with whole-collection get/replace
/// semantics.
pub trait CollectionStore: Send + Sync {
    /// Load every item under `key`. A missing key is an empty collection.
    fn load_collection(&self, key: &str) -> Result<Vec<serde_json::Value>>;
    /// Replace the collection under `key`.
    fn save_collection(&self, key: &str, items: &[serde_json::Value]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Danger => write!(f, "danger"),
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that drops everything.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: &str, _: Severity) {}
}
