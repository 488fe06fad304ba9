use crate::camera::preset::{resolve_preset, CaptureParameters, QualityPreset};
use crate::camera::still_camera::StillCamera;
use crate::common::{file_utils, timestamp_utils};
use crate::errors::CaptureError;
use crate::storage::photo_store::PhotoStorage;
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Descriptor of one saved photo. Never persisted as structured data; the
/// file at `path` is its only durable representation.
#[derive(Debug, Clone)]
pub struct CaptureRecord {
    pub path: PathBuf,
    pub timestamp: DateTime<Local>,
    pub preset: QualityPreset,
}

/// Drives one capture end to end: resolve the preset, hold the camera for
/// exactly the span of the shot, then persist the frame at the derived
/// date-partitioned path. Takes the camera `&mut`, so only one capture can be
/// in flight against the sensor at a time.
pub struct CaptureOrchestrator<S: PhotoStorage> {
    storage: S,
    base_dir: PathBuf,
}

impl<S: PhotoStorage> CaptureOrchestrator<S> {
    pub fn new(storage: S, base_dir: &Path) -> Self {
        CaptureOrchestrator {
            storage,
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Capture one still with the named preset. One attempt, no retry;
    /// callers own retry policy.
    pub async fn capture(
        &self,
        camera: &mut dyn StillCamera,
        preset_name: &str,
    ) -> Result<CaptureRecord, CaptureError> {
        let op_start = Instant::now();
        let (preset, params) = resolve_preset(preset_name)?;

        info!("📸 Starting '{}' capture on {}...", preset, camera.name());
        camera.open().await?;
        let capture_result = Self::configure_and_capture(camera, &params).await;
        // Release on every exit path, exactly once.
        let close_result = camera.close().await;

        let (frame, timestamp) = capture_result?;
        if let Err(e) = close_result {
            warn!("⚠️ Camera release reported an error after a successful capture: {}", e);
        }

        let record = self.persist_frame(&frame, timestamp, preset)?;
        info!(
            "✅ Capture '{}' saved to {} in {:?}.",
            preset,
            record.path.display(),
            op_start.elapsed()
        );
        Ok(record)
    }

    /// Capture `count` stills in quick succession with `delay` between
    /// shots. The camera is opened once and closed once around the whole
    /// burst; a mid-burst failure aborts the remainder.
    pub async fn capture_burst(
        &self,
        camera: &mut dyn StillCamera,
        preset_name: &str,
        count: u32,
        delay: std::time::Duration,
    ) -> Result<Vec<CaptureRecord>, CaptureError> {
        let op_start = Instant::now();
        let (preset, params) = resolve_preset(preset_name)?;
        if count == 0 {
            return Err(CaptureError::InvalidConfiguration(
                "Burst count must be at least 1.".to_string(),
            ));
        }

        info!("📸 Starting burst of {} '{}' captures with {:?} delay...", count, preset, delay);
        camera.open().await?;
        let burst_result = self.run_burst(camera, &params, preset, count, delay).await;
        let close_result = camera.close().await;

        let records = burst_result?;
        if let Err(e) = close_result {
            warn!("⚠️ Camera release reported an error after the burst: {}", e);
        }
        info!(
            "✅ Burst complete: {} photo(s) in {:?}.",
            records.len(),
            op_start.elapsed()
        );
        Ok(records)
    }

    async fn configure_and_capture(
        camera: &mut dyn StillCamera,
        params: &CaptureParameters,
    ) -> Result<(Vec<u8>, DateTime<Local>), CaptureError> {
        camera.configure(params).await?;
        let frame = camera.capture_still().await?;
        // Completion timestamp names the file, not the wall clock at dispatch.
        let timestamp = timestamp_utils::current_local_timestamp();
        Ok((frame, timestamp))
    }

    async fn run_burst(
        &self,
        camera: &mut dyn StillCamera,
        params: &CaptureParameters,
        preset: QualityPreset,
        count: u32,
        delay: std::time::Duration,
    ) -> Result<Vec<CaptureRecord>, CaptureError> {
        camera.configure(params).await?;
        let mut records = Vec::with_capacity(count as usize);
        for shot in 1..=count {
            debug!("  Burst shot {}/{}...", shot, count);
            let frame = camera.capture_still().await?;
            let timestamp = timestamp_utils::current_local_timestamp();
            let record = self.persist_frame(&frame, timestamp, preset)?;
            info!("  -> {}", record.path.display());
            records.push(record);
            if shot < count {
                tokio::time::sleep(delay).await;
            }
        }
        Ok(records)
    }

    fn persist_frame(
        &self,
        frame: &[u8],
        timestamp: DateTime<Local>,
        preset: QualityPreset,
    ) -> Result<CaptureRecord, CaptureError> {
        let directory = self.base_dir.join(file_utils::photo_subdirectory(&timestamp));
        self.storage.ensure_directory(&directory)?;

        let path = directory.join(file_utils::photo_filename(preset, &timestamp));
        if self.storage.exists(&path) {
            // Two captures inside the same millisecond; the rename would
            // silently replace the earlier frame.
            warn!("⚠️ Destination {} already exists and will be replaced.", path.display());
        }
        debug!("💾 Persisting {} bytes to {}", frame.len(), path.display());
        self.storage.write_file(&path, frame)?;

        Ok(CaptureRecord {
            path,
            timestamp,
            preset,
        })
    }
}
