use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApplicationConfig {
    pub output_directory: String,
    pub default_preset: String, // "production", "high_quality" or "fast"
    pub camera_command: String, // e.g. "rpicam-still", "libcamera-still"
    pub warmup_millis: u64,     // sensor settle time before the shot
    pub capture_timeout_secs: u64,
    pub burst_count_default: u32,
    pub burst_delay_millis_default: u64,
    pub log_level: Option<String>, // Optional so CLI/env can be the primary source
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            output_directory: "./photos".to_string(),
            default_preset: "production".to_string(),
            camera_command: "rpicam-still".to_string(),
            warmup_millis: 2000,
            capture_timeout_secs: 10,
            burst_count_default: 3,
            burst_delay_millis_default: 500,
            log_level: Some("info".to_string()),
        }
    }
}
