use crate::camera::libcamera_device::LibcameraStillCamera;
use crate::config_loader::MasterConfig;
use crate::core::orchestrator::CaptureOrchestrator;
use crate::operations::op_helper;
use crate::storage::photo_store::LocalPhotoStore;
use anyhow::Result;
use clap::ArgMatches;
use log::{error, info};
use std::time::Instant;

pub async fn handle_capture_cli(master_config: &MasterConfig, args: &ArgMatches) -> Result<()> {
    let op_start_time = Instant::now();
    let preset_name = op_helper::determine_preset_name(master_config, args);
    let output_dir = op_helper::determine_output_dir(master_config, args);

    info!(
        "🖼️ Preparing '{}' capture into {}.",
        preset_name,
        output_dir.display()
    );

    let app = &master_config.app_settings;
    let mut camera = LibcameraStillCamera::new(
        &app.camera_command,
        app.warmup_millis,
        app.capture_timeout_secs,
    );
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, &output_dir);

    match orchestrator.capture(&mut camera, preset_name).await {
        Ok(record) => {
            info!(
                "✅ Photo saved: {} (preset '{}', {}) in {:?}.",
                record.path.display(),
                record.preset,
                record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
                op_start_time.elapsed()
            );
            Ok(())
        }
        Err(e) => {
            error!("❌ Capture failed after {:?}: {}", op_start_time.elapsed(), e);
            Err(e.into())
        }
    }
}
