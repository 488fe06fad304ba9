use crate::camera::preset::CaptureParameters;
use crate::camera::still_camera::StillCamera;
use crate::errors::CaptureError;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Still camera backed by the libcamera command line tool (`rpicam-still`,
/// or `libcamera-still` on older OS images). Each capture is one subprocess
/// invocation that writes the encoded JPEG to stdout; the tool owns sensor
/// warmup and exclusive device access for the duration of the run.
pub struct LibcameraStillCamera {
    command: String,
    warmup_millis: u64,
    capture_timeout: Duration,
    params: Option<CaptureParameters>,
    opened: bool,
}

impl LibcameraStillCamera {
    pub fn new(command: &str, warmup_millis: u64, capture_timeout_secs: u64) -> Self {
        LibcameraStillCamera {
            command: command.to_string(),
            warmup_millis,
            capture_timeout: Duration::from_secs(capture_timeout_secs),
            params: None,
            opened: false,
        }
    }

    fn capture_args(&self, params: &CaptureParameters) -> Vec<String> {
        // -n: no preview window; -o -: JPEG to stdout; -t: warmup before the
        // shot, the sensor needs time to settle AGC/AWB after power-up.
        vec![
            "-n".to_string(),
            "-o".to_string(),
            "-".to_string(),
            "--encoding".to_string(),
            "jpg".to_string(),
            "-t".to_string(),
            self.warmup_millis.to_string(),
            "--width".to_string(),
            params.width.to_string(),
            "--height".to_string(),
            params.height.to_string(),
            "--shutter".to_string(),
            params.exposure_micros.to_string(),
            "--gain".to_string(),
            params.analogue_gain.to_string(),
            "--sharpness".to_string(),
            params.sharpness.to_string(),
            "--denoise".to_string(),
            params.noise_reduction.denoise_arg().to_string(),
        ]
    }
}

#[async_trait]
impl StillCamera for LibcameraStillCamera {
    fn name(&self) -> String {
        format!("libcamera ({})", self.command)
    }

    async fn open(&mut self) -> Result<(), CaptureError> {
        debug!("📷 Probing still-capture tool '{}'...", self.command);
        let probe_start = Instant::now();
        let output = Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                CaptureError::CameraUnavailable(format!(
                    "Still-capture tool '{}' could not be started: {}. Is the libcamera stack installed?",
                    self.command, e
                ))
            })?;
        if !output.status.success() {
            return Err(CaptureError::CameraUnavailable(format!(
                "Still-capture tool '{}' probe exited with {}.",
                self.command, output.status
            )));
        }
        self.opened = true;
        info!("📷 Camera tool '{}' available (probed in {:?}).", self.command, probe_start.elapsed());
        Ok(())
    }

    async fn configure(&mut self, params: &CaptureParameters) -> Result<(), CaptureError> {
        if !self.opened {
            return Err(CaptureError::CameraUnavailable(
                "configure() called before open().".to_string(),
            ));
        }
        debug!(
            "🎛️ Configured '{}' for {}x{} ({}) @ {}us, gain {}, sharpness {}, denoise {}",
            self.command,
            params.width,
            params.height,
            params.pixel_format,
            params.exposure_micros,
            params.analogue_gain,
            params.sharpness,
            params.noise_reduction.denoise_arg()
        );
        self.params = Some(params.clone());
        Ok(())
    }

    async fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        if !self.opened {
            return Err(CaptureError::CameraUnavailable(
                "capture_still() called before open().".to_string(),
            ));
        }
        let params = self.params.clone().ok_or_else(|| {
            CaptureError::InvalidConfiguration(
                "capture_still() called before configure().".to_string(),
            )
        })?;

        let args = self.capture_args(&params);
        debug!("📸 Running: {} {}", self.command, args.join(" "));
        let capture_start = Instant::now();

        let output = tokio::time::timeout(
            self.capture_timeout,
            Command::new(&self.command).args(&args).output(),
        )
        .await
        .map_err(|_| {
            CaptureError::CaptureFailed(format!(
                "Capture did not complete within {:?}.",
                self.capture_timeout
            ))
        })?
        .map_err(|e| {
            CaptureError::CameraUnavailable(format!(
                "Failed to spawn '{}': {}",
                self.command, e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // The tool reports a held device as an acquire failure on stderr.
            let busy = stderr.contains("busy")
                || stderr.contains("Device or resource busy")
                || stderr.contains("failed to acquire");
            let message = format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            );
            return Err(if busy {
                CaptureError::CameraUnavailable(message)
            } else {
                CaptureError::CaptureFailed(message)
            });
        }

        if output.stdout.is_empty() {
            return Err(CaptureError::CaptureFailed(format!(
                "'{}' exited cleanly but produced no image data.",
                self.command
            )));
        }

        info!(
            "📸 Captured {:.1} KB still in {:?}.",
            output.stdout.len() as f64 / 1024.0,
            capture_start.elapsed()
        );
        Ok(output.stdout)
    }

    async fn close(&mut self) -> Result<(), CaptureError> {
        if !self.opened {
            warn!("📷 close() called on a camera that was never opened.");
        }
        // The subprocess releases the sensor when it exits; nothing is held
        // between captures.
        self.opened = false;
        self.params = None;
        debug!("📷 Camera '{}' released.", self.command);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::preset::QualityPreset;

    #[test]
    fn capture_args_carry_resolved_parameters() {
        let camera = LibcameraStillCamera::new("rpicam-still", 2000, 10);
        let params = QualityPreset::Production.parameters();
        let args = camera.capture_args(&params);
        let joined = args.join(" ");
        assert!(joined.contains("--width 2028"));
        assert!(joined.contains("--height 1520"));
        assert!(joined.contains("--shutter 8000"));
        assert!(joined.contains("--gain 1.5"));
        assert!(joined.contains("--sharpness 1.2"));
        assert!(joined.contains("--denoise cdn_fast"));
        assert!(joined.contains("-t 2000"));
        assert!(joined.contains("-o -"));
    }

    #[tokio::test]
    async fn capture_before_open_is_camera_unavailable() {
        let mut camera = LibcameraStillCamera::new("rpicam-still", 0, 1);
        match camera.capture_still().await {
            Err(CaptureError::CameraUnavailable(_)) => {}
            other => panic!("expected CameraUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn open_with_missing_binary_is_camera_unavailable() {
        let mut camera = LibcameraStillCamera::new("definitely-not-a-camera-tool", 0, 1);
        match camera.open().await {
            Err(CaptureError::CameraUnavailable(_)) => {}
            other => panic!("expected CameraUnavailable, got {:?}", other),
        }
    }
}
