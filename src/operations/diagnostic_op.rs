use crate::camera::libcamera_device::LibcameraStillCamera;
use crate::camera::preset::{resolve_preset, QualityPreset};
use crate::camera::still_camera::StillCamera;
use crate::config_loader::MasterConfig;
use crate::core::orchestrator::CaptureOrchestrator;
use crate::storage::photo_store::{LocalPhotoStore, PhotoStorage};
use anyhow::{bail, Result};
use clap::ArgMatches;
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

struct DiagnosticResult {
    test_name: String,
    success: bool,
    details: String,
}

pub async fn handle_diagnostic_cli(master_config: &MasterConfig, args: &ArgMatches) -> Result<()> {
    let overall_start = Instant::now();
    info!("🩺 Starting diagnostic test suite...");
    let mut results: Vec<DiagnosticResult> = Vec::new();
    let app = &master_config.app_settings;

    // 1. Preset table resolves for all defined presets and rejects garbage.
    info!("  DIAGNOSTIC: Checking quality preset table... 🎛️");
    let preset_check = QualityPreset::ALL
        .iter()
        .map(|p| resolve_preset(p.as_str()).map(|_| ()))
        .collect::<Result<Vec<()>, _>>()
        .and_then(|_| match resolve_preset("no-such-preset") {
            Err(_) => Ok(()),
            Ok(_) => Err(crate::errors::CaptureError::InvalidConfiguration(
                "Unknown preset name was not rejected.".to_string(),
            )),
        });
    results.push(match preset_check {
        Ok(()) => DiagnosticResult {
            test_name: "Preset table".to_string(),
            success: true,
            details: "All 3 presets resolve; unknown names rejected.".to_string(),
        },
        Err(e) => DiagnosticResult {
            test_name: "Preset table".to_string(),
            success: false,
            details: format!("Failed: {}", e),
        },
    });

    // 2. Camera tool availability (open/close round trip, no frame taken).
    info!("  DIAGNOSTIC: Probing camera tool '{}'... 📷", app.camera_command);
    let probe_start = Instant::now();
    let mut camera = LibcameraStillCamera::new(
        &app.camera_command,
        app.warmup_millis,
        app.capture_timeout_secs,
    );
    let camera_probe = match camera.open().await {
        Ok(()) => camera.close().await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    results.push(match camera_probe {
        Ok(()) => DiagnosticResult {
            test_name: format!("Camera tool ('{}')", app.camera_command),
            success: true,
            details: format!("Open/close round trip completed in {:?}.", probe_start.elapsed()),
        },
        Err(e) => DiagnosticResult {
            test_name: format!("Camera tool ('{}')", app.camera_command),
            success: false,
            details: format!("Failed: {}", e),
        },
    });

    // 3. Photo store writability probe in the configured output tree.
    info!("  DIAGNOSTIC: Probing photo store writability... 💾");
    let store = LocalPhotoStore;
    let probe_dir = PathBuf::from(&app.output_directory).join("diagnostics");
    let probe_file = probe_dir.join("write_probe.tmp");
    let storage_probe = store
        .ensure_directory(&probe_dir)
        .and_then(|_| store.write_file(&probe_file, b"platecam diagnostic write probe"))
        .map(|_| {
            if let Err(e) = std::fs::remove_file(&probe_file) {
                warn!("  Could not remove write probe '{}': {}", probe_file.display(), e);
            }
        });
    results.push(match storage_probe {
        Ok(()) => DiagnosticResult {
            test_name: "Photo store".to_string(),
            success: true,
            details: format!("Probe write under {} succeeded.", probe_dir.display()),
        },
        Err(e) => DiagnosticResult {
            test_name: "Photo store".to_string(),
            success: false,
            details: format!("Failed: {}", e),
        },
    });

    // 4. Optional full end-to-end capture, decoded and dimension-checked.
    if args.get_flag("capture") {
        info!("  DIAGNOSTIC: Running end-to-end test capture... 📸");
        let capture_start = Instant::now();
        let mut capture_camera = LibcameraStillCamera::new(
            &app.camera_command,
            app.warmup_millis,
            app.capture_timeout_secs,
        );
        let orchestrator = CaptureOrchestrator::new(LocalPhotoStore, &probe_dir);
        let preset_name = &app.default_preset;

        let outcome = match orchestrator.capture(&mut capture_camera, preset_name).await {
            Ok(record) => verify_capture_dimensions(&record.path, preset_name)
                .map(|(w, h)| format!(
                    "Captured and decoded {}x{} JPEG at {} in {:?}.",
                    w, h, record.path.display(), capture_start.elapsed()
                )),
            Err(e) => Err(format!("Capture failed: {}", e)),
        };
        results.push(match outcome {
            Ok(details) => DiagnosticResult {
                test_name: format!("End-to-end capture ('{}')", preset_name),
                success: true,
                details,
            },
            Err(details) => DiagnosticResult {
                test_name: format!("End-to-end capture ('{}')", preset_name),
                success: false,
                details,
            },
        });
    }

    info!("\n\n📋 ----- Diagnostic Test Summary (Total Suite Time: {:?}) -----", overall_start.elapsed());
    let mut overall_success = true;
    for result in &results {
        let status_emoji = if result.success { "✅ PASS" } else { "❌ FAIL" };
        info!("Test: {:<35} | Status: {:<10} | Details: {}", result.test_name, status_emoji, result.details);
        if !result.success {
            overall_success = false;
        }
    }
    info!("----------------------------------------------------------------------");
    if overall_success {
        info!("🎉 All diagnostic tests passed.");
        Ok(())
    } else {
        error!("🔥 One or more diagnostic tests failed. Please review logs above.");
        bail!("Diagnostic test suite reported failures")
    }
}

fn verify_capture_dimensions(path: &std::path::Path, preset_name: &str) -> Result<(u32, u32), String> {
    use image::GenericImageView;

    let bytes = std::fs::read(path).map_err(|e| format!("Could not read back capture: {}", e))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("Capture is not a decodable image: {}", e))?;
    let (width, height) = decoded.dimensions();

    let expected = preset_name
        .parse::<QualityPreset>()
        .map_err(|e| e.to_string())?
        .parameters();
    if (width, height) != (expected.width, expected.height) {
        return Err(format!(
            "Decoded dimensions {}x{} do not match preset '{}' ({}x{}).",
            width, height, preset_name, expected.width, expected.height
        ));
    }
    Ok((width, height))
}
