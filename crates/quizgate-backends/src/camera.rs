//! Scripted camera for driving the proctor gate without hardware.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quizgate_core::error::CaptureError;
use quizgate_core::traits::{CaptureConstraints, CaptureDevice, CaptureStream};

/// How the camera answers a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraBehavior {
    /// Grant every request.
    #[default]
    Grant,
    /// The user dismisses the permission prompt.
    Deny,
    /// No video input is attached.
    Absent,
    /// The prompt is never answered.
    Hang,
}

/// A capture device whose answer is fixed up front.
///
/// Only one stream may be outstanding at a time; a second request while a
/// stream is live fails with [`CaptureError::Busy`].
pub struct ScriptedCamera {
    label: String,
    behavior: Mutex<CameraBehavior>,
    answer_delay: Duration,
    live: Mutex<HashSet<Uuid>>,
    requests: AtomicU32,
    releases: AtomicU32,
}

impl ScriptedCamera {
    pub fn new(behavior: CameraBehavior) -> Self {
        Self {
            label: "scripted-camera".to_string(),
            behavior: Mutex::new(behavior),
            answer_delay: Duration::ZERO,
            live: Mutex::new(HashSet::new()),
            requests: AtomicU32::new(0),
            releases: AtomicU32::new(0),
        }
    }

    pub fn granting() -> Self {
        Self::new(CameraBehavior::Grant)
    }

    pub fn denying() -> Self {
        Self::new(CameraBehavior::Deny)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Time the simulated user takes to answer the permission prompt.
    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = delay;
        self
    }

    /// Change the answer for subsequent requests.
    pub fn set_behavior(&self, behavior: CameraBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn behavior(&self) -> CameraBehavior {
        *self.behavior.lock().unwrap()
    }

    /// Number of permission requests received.
    pub fn request_count(&self) -> u32 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Number of streams released.
    pub fn release_count(&self) -> u32 {
        self.releases.load(Ordering::Relaxed)
    }

    /// Whether a granted stream has not been released yet.
    pub fn is_streaming(&self) -> bool {
        !self.live.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl CaptureDevice for ScriptedCamera {
    fn name(&self) -> &str {
        &self.label
    }

    async fn request_video_capture(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<CaptureStream, CaptureError> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        if !constraints.video {
            return Err(CaptureError::NoDevice);
        }

        if !self.answer_delay.is_zero() {
            tokio::time::sleep(self.answer_delay).await;
        }

        match self.behavior() {
            CameraBehavior::Grant => {
                let mut live = self.live.lock().unwrap();
                if !live.is_empty() {
                    return Err(CaptureError::Busy);
                }
                let stream = CaptureStream::new(self.label.clone());
                live.insert(stream.id);
                Ok(stream)
            }
            CameraBehavior::Deny => Err(CaptureError::Denied("permission dismissed".into())),
            CameraBehavior::Absent => Err(CaptureError::NoDevice),
            CameraBehavior::Hang => std::future::pending().await,
        }
    }

    fn release_stream(&self, stream: CaptureStream) {
        if self.live.lock().unwrap().remove(&stream.id) {
            self.releases.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(stream = %stream.id, "camera stream stopped");
        } else {
            tracing::warn!(stream = %stream.id, "release of unknown camera stream");
        }
    }
}
