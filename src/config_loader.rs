use crate::app_config::ApplicationConfig;
use crate::camera::preset::QualityPreset;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Deserialize, Clone)]
pub struct MasterConfig {
    #[serde(rename = "application")]
    pub app_settings: ApplicationConfig,
}

pub fn load_config(path: &str) -> Result<MasterConfig> {
    debug!("📄 Attempting to load config from: {}", path);
    let start_time = Instant::now();

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'. 📖", path))?;
    debug!("Read config file in {:?}", start_time.elapsed());

    let parse_start_time = Instant::now();
    let config: MasterConfig = serde_yaml::from_str(&config_str)
        .with_context(|| format!("Failed to parse YAML configuration from '{}'. 💔", path))?;
    debug!("Parsed YAML in {:?}", parse_start_time.elapsed());

    validate_master_config(&config).with_context(|| "Master configuration validation failed 👎")?;

    info!("✅ Successfully loaded and validated configuration from '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

fn validate_master_config(config: &MasterConfig) -> Result<()> {
    debug!("🕵️ Validating master configuration...");
    let app = &config.app_settings;

    if app.output_directory.is_empty() {
        bail!("❌ Application output_directory cannot be empty.");
    }
    let output_path = Path::new(&app.output_directory);
    if output_path.exists() && !output_path.is_dir() {
        bail!("❌ Output directory '{}' exists but is not a directory.", app.output_directory);
    }

    app.default_preset
        .parse::<QualityPreset>()
        .with_context(|| format!("❌ Invalid default_preset '{}' in configuration.", app.default_preset))?;

    if app.camera_command.is_empty() {
        bail!("❌ Application camera_command cannot be empty.");
    }
    if app.capture_timeout_secs == 0 {
        bail!("❌ Application capture_timeout_secs must be at least 1.");
    }
    if app.burst_count_default == 0 {
        bail!("❌ Application burst_count_default must be at least 1.");
    }

    debug!("👍 Master configuration validated successfully.");
    Ok(())
}
