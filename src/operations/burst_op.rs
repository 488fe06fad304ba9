use crate::camera::libcamera_device::LibcameraStillCamera;
use crate::config_loader::MasterConfig;
use crate::core::orchestrator::CaptureOrchestrator;
use crate::operations::op_helper;
use crate::storage::photo_store::LocalPhotoStore;
use anyhow::Result;
use clap::ArgMatches;
use log::{error, info};
use std::time::{Duration, Instant};

pub async fn handle_burst_cli(master_config: &MasterConfig, args: &ArgMatches) -> Result<()> {
    let op_start_time = Instant::now();
    let app = &master_config.app_settings;

    let preset_name = op_helper::determine_preset_name(master_config, args);
    let output_dir = op_helper::determine_output_dir(master_config, args);
    let count = args
        .get_one::<u32>("count")
        .copied()
        .unwrap_or(app.burst_count_default);
    let delay_millis = args
        .get_one::<u64>("delay")
        .copied()
        .unwrap_or(app.burst_delay_millis_default);

    info!(
        "🖼️ Preparing burst of {} '{}' capture(s) ({}ms apart) into {}.",
        count,
        preset_name,
        delay_millis,
        output_dir.display()
    );

    let mut camera = LibcameraStillCamera::new(
        &app.camera_command,
        app.warmup_millis,
        app.capture_timeout_secs,
    );
    let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, &output_dir);

    match orchestrator
        .capture_burst(
            &mut camera,
            preset_name,
            count,
            Duration::from_millis(delay_millis),
        )
        .await
    {
        Ok(records) => {
            info!(
                "✅ Burst captured {} photo(s) in {:?}:",
                records.len(),
                op_start_time.elapsed()
            );
            for record in records {
                info!("  -> {}", record.path.display());
            }
            Ok(())
        }
        Err(e) => {
            error!("❌ Burst failed after {:?}: {}", op_start_time.elapsed(), e);
            Err(e.into())
        }
    }
}
