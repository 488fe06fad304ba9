use crate::config_loader::MasterConfig;
use clap::ArgMatches;
use log::debug;
use std::path::PathBuf;

/// Base photo directory for an operation: CLI `--output` wins, otherwise the
/// configured directory.
pub fn determine_output_dir(master_config: &MasterConfig, args: &ArgMatches) -> PathBuf {
    match args.get_one::<String>("output") {
        Some(path_str) => {
            debug!("  Output directory specified via CLI: {}", path_str);
            PathBuf::from(path_str)
        }
        None => {
            debug!("  Using configured output directory: {}", master_config.app_settings.output_directory);
            PathBuf::from(&master_config.app_settings.output_directory)
        }
    }
}

/// Preset name for an operation: CLI `--preset` wins, otherwise the
/// configured default. Resolution (and rejection of unknown names) happens
/// in the orchestrator.
pub fn determine_preset_name<'a>(master_config: &'a MasterConfig, args: &'a ArgMatches) -> &'a str {
    match args.get_one::<String>("preset") {
        Some(name) => {
            debug!("  Preset specified via CLI: {}", name);
            name
        }
        None => {
            debug!("  Using configured default preset: {}", master_config.app_settings.default_preset);
            &master_config.app_settings.default_preset
        }
    }
}
