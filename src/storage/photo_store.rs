use crate::errors::CaptureError;
use log::debug;
use std::fs;
use std::path::Path;

/// Minimal filesystem surface the capture core needs. The orchestrator only
/// talks to this trait, so tests substitute an in-memory or failing store.
pub trait PhotoStorage: Send + Sync {
    /// Create `path` and any missing parents. Idempotent: succeeds if the
    /// directory is already present.
    fn ensure_directory(&self, path: &Path) -> Result<(), CaptureError>;

    /// Persist `bytes` at `path` atomically. On failure no partial file may
    /// remain visible at `path`.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), CaptureError>;

    fn exists(&self, path: &Path) -> bool;
}

/// Photo store over the local filesystem. Writes go to a temporary name in
/// the destination directory and are renamed into place, so a reader (the
/// file browser sharing this tree) never sees a half-written JPEG.
pub struct LocalPhotoStore;

impl PhotoStorage for LocalPhotoStore {
    fn ensure_directory(&self, path: &Path) -> Result<(), CaptureError> {
        if path.exists() {
            if !path.is_dir() {
                return Err(CaptureError::StorageUnavailable(format!(
                    "Output path '{}' exists but is not a directory.",
                    path.display()
                )));
            }
            return Ok(());
        }
        debug!("📁 Output directory '{}' does not exist, creating it.", path.display());
        fs::create_dir_all(path).map_err(|e| {
            CaptureError::StorageUnavailable(format!(
                "Failed to create output directory '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> Result<(), CaptureError> {
        let dir = path.parent().ok_or_else(|| {
            CaptureError::StorageUnavailable(format!(
                "Destination path '{}' has no parent directory.",
                path.display()
            ))
        })?;
        let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            CaptureError::StorageUnavailable(format!(
                "Destination path '{}' has no usable file name.",
                path.display()
            ))
        })?;

        // Same directory as the destination so the rename stays on one
        // filesystem and is atomic.
        let tmp_path = dir.join(format!(".{}.tmp", file_name));
        debug!("💾 Writing {} bytes to temporary file '{}'", bytes.len(), tmp_path.display());

        if let Err(e) = fs::write(&tmp_path, bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CaptureError::StorageUnavailable(format!(
                "Failed to write temporary file '{}': {}",
                tmp_path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(CaptureError::StorageUnavailable(format!(
                "Failed to move '{}' into place at '{}': {}",
                tmp_path.display(),
                path.display(),
                e
            )));
        }
        debug!("💾 Renamed temporary file into place: {}", path.display());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
