use anyhow::{bail, Context, Result};
use log::{debug, error, info};
use platecam::common::logging_setup;
use platecam::{cli, config_loader, operations};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or("config/platecam.yaml");

    let master_config = match config_loader::load_config(config_path) {
        Ok(cfg) => {
            logging_setup::initialize_logging(Some(&cfg), &matches)
                .context("Failed to initialize logging with full config")?;
            info!("✅ Configuration loaded from: {}", config_path);
            cfg
        }
        Err(e) => {
            logging_setup::initialize_logging(None, &matches)
                .context("Failed to initialize logging with basic settings after config load failure")?;
            error!("❌ Failed to load configuration from '{}': {:#}. Exiting.", config_path, e);
            return Err(e.context(format!("Failed to load configuration from '{}'", config_path)));
        }
    };

    info!(
        "🚀 platecam starting (camera tool '{}', photos under '{}').",
        master_config.app_settings.camera_command,
        master_config.app_settings.output_directory
    );

    if let Some((operation_name, sub_matches)) = matches.subcommand() {
        debug!("🎬 Dispatching to subcommand: {}", operation_name);
        let op_start_time = Instant::now();

        let op_result: Result<()> = match operation_name {
            "capture" => operations::capture_op::handle_capture_cli(&master_config, sub_matches).await,
            "burst" => operations::burst_op::handle_burst_cli(&master_config, sub_matches).await,
            "diagnose" => operations::diagnostic_op::handle_diagnostic_cli(&master_config, sub_matches).await,
            _ => bail!("Subcommand '{}' not implemented.", operation_name),
        };

        if let Err(e) = op_result {
            error!("❌ Operation '{}' failed after {:?}: {:#}", operation_name, op_start_time.elapsed(), e);
            return Err(e);
        }
        info!("✅ Operation '{}' completed successfully in {:?}.", operation_name, op_start_time.elapsed());
    } else {
        info!("🤔 No subcommand provided. Try 'platecam capture' or 'platecam --help'.");
    }

    info!("🏁 platecam finished in {:?}.", main_start_time.elapsed());
    Ok(())
}
