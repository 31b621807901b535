//! Proctor gate: camera presence as a precondition for an attempt.
//!
//! [`ProctorGate::begin`] is the only suspension point in the engine. The
//! runner must not be built until it has resolved. A [`ProctorSession`]
//! releases the capture device exactly once: on [`ProctorSession::end`], or
//! on drop if `end` was never called.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AssessmentError, CaptureError, Result};
use crate::traits::{
    CaptureConstraints, CaptureDevice, CaptureStream, PreviewHandle, PreviewOverlay,
    PreviewSurface,
};

/// Default time allowed for the user to answer the permission prompt.
pub const DEFAULT_PERMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Acquires capture sessions.
pub struct ProctorGate {
    device: Arc<dyn CaptureDevice>,
    preview: Arc<dyn PreviewSurface>,
    overlay: PreviewOverlay,
    permission_timeout: Duration,
}

impl ProctorGate {
    pub fn new(device: Arc<dyn CaptureDevice>, preview: Arc<dyn PreviewSurface>) -> Self {
        Self {
            device,
            preview,
            overlay: PreviewOverlay::default(),
            permission_timeout: DEFAULT_PERMISSION_TIMEOUT,
        }
    }

    pub fn with_overlay(mut self, overlay: PreviewOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_permission_timeout(mut self, timeout: Duration) -> Self {
        self.permission_timeout = timeout;
        self
    }

    /// Request the camera and mount the preview.
    ///
    /// Denial, a missing device, a busy device and an unanswered prompt all
    /// surface as [`AssessmentError::PermissionDenied`]. Nothing is retried.
    pub async fn begin(&self) -> Result<ProctorSession> {
        let constraints = CaptureConstraints::video_only();
        let request = self.device.request_video_capture(&constraints);

        let stream = match tokio::time::timeout(self.permission_timeout, request).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                tracing::warn!(device = self.device.name(), "camera request failed: {e}");
                return Err(e.into());
            }
            Err(_) => {
                let e = CaptureError::Timeout(self.permission_timeout.as_millis() as u64);
                tracing::warn!(device = self.device.name(), "{e}");
                return Err(AssessmentError::from(e));
            }
        };

        let preview = self.preview.mount(&self.overlay, &stream);
        let session = ProctorSession {
            id: Uuid::new_v4(),
            device: Arc::clone(&self.device),
            surface: Arc::clone(&self.preview),
            capture: Some(ActiveCapture { stream, preview }),
        };
        tracing::info!(session = %session.id, device = self.device.name(), "proctor session started");
        Ok(session)
    }
}

struct ActiveCapture {
    stream: CaptureStream,
    preview: PreviewHandle,
}

/// A live capture stream plus its on-screen preview.
pub struct ProctorSession {
    id: Uuid,
    device: Arc<dyn CaptureDevice>,
    surface: Arc<dyn PreviewSurface>,
    capture: Option<ActiveCapture>,
}

impl ProctorSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.capture.is_some()
    }

    pub fn stream(&self) -> Option<&CaptureStream> {
        self.capture.as_ref().map(|c| &c.stream)
    }

    /// Stop the device and remove the preview.
    ///
    /// Returns `true` if this call released the device, `false` if the
    /// session had already ended.
    pub fn end(&mut self) -> bool {
        let Some(capture) = self.capture.take() else {
            return false;
        };
        self.device.release_stream(capture.stream);
        self.surface.unmount(capture.preview);
        tracing::info!(session = %self.id, "proctor session ended");
        true
    }
}

impl Drop for ProctorSession {
    fn drop(&mut self) {
        if self.is_active() {
            tracing::debug!(session = %self.id, "releasing proctor session on drop");
            self.end();
        }
    }
}

impl std::fmt::Debug for ProctorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProctorSession")
            .field("id", &self.id)
            .field("device", &self.device.name())
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    enum Behaviour {
        Grant,
        Deny,
        Hang,
    }

    struct FakeCamera {
        behaviour: Behaviour,
        requests: AtomicU32,
        releases: AtomicU32,
    }

    impl FakeCamera {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                requests: AtomicU32::new(0),
                releases: AtomicU32::new(0),
            })
        }
    }

    #[async_trait]
    impl CaptureDevice for FakeCamera {
        fn name(&self) -> &str {
            "fake"
        }

        async fn request_video_capture(
            &self,
            constraints: &CaptureConstraints,
        ) -> std::result::Result<CaptureStream, CaptureError> {
            assert!(!constraints.audio);
            self.requests.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Grant => Ok(CaptureStream::new("fake")),
                Behaviour::Deny => Err(CaptureError::Denied("user dismissed prompt".into())),
                Behaviour::Hang => std::future::pending().await,
            }
        }

        fn release_stream(&self, _stream: CaptureStream) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct CountingPreview {
        mounts: AtomicU32,
        unmounts: AtomicU32,
    }

    impl PreviewSurface for CountingPreview {
        fn mount(&self, _: &PreviewOverlay, _: &CaptureStream) -> PreviewHandle {
            self.mounts.fetch_add(1, Ordering::SeqCst);
            PreviewHandle(Uuid::new_v4())
        }
        fn unmount(&self, _: PreviewHandle) {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn end_releases_exactly_once() {
        let camera = FakeCamera::new(Behaviour::Grant);
        let preview = Arc::new(CountingPreview::default());
        let gate = ProctorGate::new(camera.clone(), preview.clone());

        let mut session = gate.begin().await.unwrap();
        assert!(session.is_active());
        assert_eq!(preview.mounts.load(Ordering::SeqCst), 1);

        assert!(session.end());
        assert!(!session.end());
        drop(session);

        assert_eq!(camera.releases.load(Ordering::SeqCst), 1);
        assert_eq!(preview.unmounts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_releases_unended_session() {
        let camera = FakeCamera::new(Behaviour::Grant);
        let preview = Arc::new(CountingPreview::default());
        let gate = ProctorGate::new(camera.clone(), preview.clone());

        {
            let _session = gate.begin().await.unwrap();
        }

        assert_eq!(camera.releases.load(Ordering::SeqCst), 1);
        assert_eq!(preview.unmounts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn denial_creates_no_session() {
        let camera = FakeCamera::new(Behaviour::Deny);
        let preview = Arc::new(CountingPreview::default());
        let gate = ProctorGate::new(camera.clone(), preview.clone());

        let err = gate.begin().await.unwrap_err();
        assert!(matches!(err, AssessmentError::PermissionDenied(_)));
        assert_eq!(preview.mounts.load(Ordering::SeqCst), 0);
        assert_eq!(camera.releases.load(Ordering::SeqCst), 0);

        // The caller may simply try again.
        assert!(gate.begin().await.is_err());
        assert_eq!(camera.requests.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unanswered_prompt_times_out() {
        let camera = FakeCamera::new(Behaviour::Hang);
        let gate = ProctorGate::new(camera, Arc::new(CountingPreview::default()))
            .with_permission_timeout(Duration::from_millis(250));

        let err = gate.begin().await.unwrap_err();
        assert_eq!(
            err,
            AssessmentError::PermissionDenied("permission request timed out after 250ms".into())
        );
    }
}
