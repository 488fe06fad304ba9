use crate::camera::preset::CaptureParameters;
use crate::errors::CaptureError;
use async_trait::async_trait;

/// Capability surface of one exclusive-access still camera. The orchestrator
/// acquires it for exactly the span of one capture (or one burst) and
/// guarantees `close` on every exit path; implementations do not need to
/// defend against overlapping captures.
#[async_trait]
pub trait StillCamera: Send {
    fn name(&self) -> String;

    /// Acquire the device. Fails with `CameraUnavailable` if the device is
    /// absent or already held by another process.
    async fn open(&mut self) -> Result<(), CaptureError>;

    /// Apply resolved capture settings. Must be called between `open` and
    /// `capture_still`.
    async fn configure(&mut self, params: &CaptureParameters) -> Result<(), CaptureError>;

    /// Capture exactly one still frame and return the encoded JPEG bytes.
    /// Fails with `CaptureFailed` on a mid-capture device error.
    async fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError>;

    /// Release the device. Safe to call after a failed capture.
    async fn close(&mut self) -> Result<(), CaptureError>;
}
