use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

use platecam::camera::preset::CaptureParameters;
use platecam::camera::still_camera::StillCamera;
use platecam::core::orchestrator::CaptureOrchestrator;
use platecam::errors::CaptureError;
use platecam::storage::photo_store::{LocalPhotoStore, PhotoStorage};

const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0xFF, 0xD9];

/// Scripted stand-in for the hardware camera. Counts lifecycle calls so the
/// tests can assert the scoped-acquisition guarantees.
struct MockCamera {
    opens: usize,
    closes: usize,
    captures: usize,
    configured_with: Option<CaptureParameters>,
    fail_open: bool,
    fail_capture: bool,
}

impl MockCamera {
    fn working() -> Self {
        MockCamera {
            opens: 0,
            closes: 0,
            captures: 0,
            configured_with: None,
            fail_open: false,
            fail_capture: false,
        }
    }

    fn failing_mid_capture() -> Self {
        MockCamera {
            fail_capture: true,
            ..MockCamera::working()
        }
    }

    fn busy() -> Self {
        MockCamera {
            fail_open: true,
            ..MockCamera::working()
        }
    }
}

#[async_trait]
impl StillCamera for MockCamera {
    fn name(&self) -> String {
        "mock".to_string()
    }

    async fn open(&mut self) -> Result<(), CaptureError> {
        if self.fail_open {
            return Err(CaptureError::CameraUnavailable(
                "device held by another process".to_string(),
            ));
        }
        self.opens += 1;
        Ok(())
    }

    async fn configure(&mut self, params: &CaptureParameters) -> Result<(), CaptureError> {
        self.configured_with = Some(params.clone());
        Ok(())
    }

    async fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        self.captures += 1;
        if self.fail_capture {
            return Err(CaptureError::CaptureFailed("sensor timeout".to_string()));
        }
        Ok(FAKE_JPEG.to_vec())
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        self.closes += 1;
        Ok(())
    }
}

/// Store whose writes always fail, simulating a full disk. Directories are
/// still created so the failure hits at the write step.
struct FullDiskStore;

impl PhotoStorage for FullDiskStore {
    fn ensure_directory(&self, path: &Path) -> Result<(), CaptureError> {
        std::fs::create_dir_all(path).map_err(CaptureError::from)
    }

    fn write_file(&self, _path: &Path, _bytes: &[u8]) -> Result<(), CaptureError> {
        Err(CaptureError::StorageUnavailable("No space left on device".to_string()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn files_under(dir: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

#[tokio::test]
async fn capture_writes_one_photo_at_the_derived_path() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::working();

    let record = orchestrator.capture(&mut camera, "production").await.unwrap();

    assert_eq!(camera.opens, 1);
    assert_eq!(camera.closes, 1);
    assert_eq!(camera.captures, 1);

    // Resolved production parameters reached the device.
    let params = camera.configured_with.as_ref().unwrap();
    assert_eq!((params.width, params.height), (2028, 1520));

    // Exactly one file, at the path in the record, under YYYY/MM/DD.
    let files = files_under(base.path());
    assert_eq!(files, vec![record.path.clone()]);
    assert_eq!(std::fs::read(&record.path).unwrap(), FAKE_JPEG);

    let relative = record.path.strip_prefix(base.path()).unwrap();
    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    assert_eq!(components.len(), 4, "expected YYYY/MM/DD/file, got {:?}", components);
    let file_name = components.last().unwrap();
    assert!(file_name.starts_with("capture_production_"), "{}", file_name);
    assert!(file_name.ends_with(".jpg"), "{}", file_name);
    // capture_production_YYYYMMDD_HHMMSS_mmm.jpg
    assert_eq!(file_name.len(), "capture_production_20240315_140509_123.jpg".len());
}

#[tokio::test]
async fn unknown_preset_is_rejected_before_the_camera_is_touched() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::working();

    match orchestrator.capture(&mut camera, "bogus").await {
        Err(CaptureError::InvalidConfiguration(_)) => {}
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }

    assert_eq!(camera.opens, 0, "camera must not be opened for an invalid preset");
    assert_eq!(camera.closes, 0);
    assert!(files_under(base.path()).is_empty(), "no file may be written");
}

#[tokio::test]
async fn mid_capture_failure_releases_the_camera_and_writes_nothing() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::failing_mid_capture();

    match orchestrator.capture(&mut camera, "fast").await {
        Err(CaptureError::CaptureFailed(_)) => {}
        other => panic!("expected CaptureFailed, got {:?}", other),
    }

    assert_eq!(camera.opens, 1);
    assert_eq!(camera.closes, 1, "close must run exactly once on the failure path");
    assert!(files_under(base.path()).is_empty(), "no temporary or final file may remain");
}

#[tokio::test]
async fn busy_device_surfaces_camera_unavailable() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::busy();

    match orchestrator.capture(&mut camera, "production").await {
        Err(CaptureError::CameraUnavailable(_)) => {}
        other => panic!("expected CameraUnavailable, got {:?}", other),
    }
    assert!(files_under(base.path()).is_empty());
}

#[tokio::test]
async fn refused_write_surfaces_storage_unavailable_with_no_partial_file() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(FullDiskStore, base.path());
    let mut camera = MockCamera::working();

    match orchestrator.capture(&mut camera, "production").await {
        Err(CaptureError::StorageUnavailable(_)) => {}
        other => panic!("expected StorageUnavailable, got {:?}", other),
    }

    assert_eq!(camera.closes, 1, "camera must still be released");
    assert!(files_under(base.path()).is_empty(), "no partial file may remain at the final path");
}

#[tokio::test]
async fn burst_opens_once_and_writes_every_shot() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::working();

    let records = orchestrator
        .capture_burst(&mut camera, "fast", 3, Duration::from_millis(2))
        .await
        .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(camera.opens, 1, "burst must hold one camera acquisition");
    assert_eq!(camera.closes, 1);
    assert_eq!(camera.captures, 3);
    assert_eq!(files_under(base.path()).len(), 3);
}

#[tokio::test]
async fn burst_of_zero_is_invalid_configuration() {
    let base = TempDir::new().unwrap();
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, base.path());
    let mut camera = MockCamera::working();

    match orchestrator
        .capture_burst(&mut camera, "fast", 0, Duration::ZERO)
        .await
    {
        Err(CaptureError::InvalidConfiguration(_)) => {}
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
    assert_eq!(camera.opens, 0);
}
