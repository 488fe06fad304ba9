use thiserror::Error;

/// Error surface of one capture attempt. Every invocation either fully
/// succeeds (file on disk, record returned) or fails with exactly one of
/// these kinds; nothing is swallowed.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Caller/programmer error (unknown preset, bad settings). Never retried.
    #[error("Invalid Configuration: {0}")]
    InvalidConfiguration(String),

    /// Device absent or held by another process. Candidate for external
    /// retry with backoff.
    #[error("Camera Unavailable: {0}")]
    CameraUnavailable(String),

    /// Device reported an error mid-capture (sensor timeout, truncated
    /// frame). Candidate for a single external retry.
    #[error("Capture Failed: {0}")]
    CaptureFailed(String),

    /// Directory or file write failure. Fatal for this invocation; disk
    /// conditions rarely self-heal within one run.
    #[error("Storage Unavailable: {0}")]
    StorageUnavailable(String),
}

// Filesystem errors from std land on the storage kind.
impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::StorageUnavailable(err.to_string())
    }
}
