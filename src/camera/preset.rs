use crate::errors::CaptureError;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Named bundle of capture settings for the IMX477. Closed enumeration:
/// an unknown name is rejected at resolution time, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityPreset {
    /// 2028x1520, tuned for plate legibility vs. file size.
    Production,
    /// Full sensor resolution, slow shutter, heavy denoise.
    HighQuality,
    /// 1080p, fast shutter, high gain.
    Fast,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [
        QualityPreset::Production,
        QualityPreset::HighQuality,
        QualityPreset::Fast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Production => "production",
            QualityPreset::HighQuality => "high_quality",
            QualityPreset::Fast => "fast",
        }
    }

    /// Fixed mapping from preset to sensor settings. Pure; one preset always
    /// yields the same parameters.
    pub fn parameters(&self) -> CaptureParameters {
        match self {
            QualityPreset::Production => CaptureParameters {
                width: 2028,
                height: 1520,
                pixel_format: "RGB888",
                exposure_micros: 8_000,
                analogue_gain: 1.5,
                sharpness: 1.2,
                noise_reduction: NoiseReduction::Minimal,
            },
            QualityPreset::HighQuality => CaptureParameters {
                width: 4056,
                height: 3040,
                pixel_format: "RGB888",
                exposure_micros: 15_000,
                analogue_gain: 1.0,
                sharpness: 1.0,
                noise_reduction: NoiseReduction::High,
            },
            QualityPreset::Fast => CaptureParameters {
                width: 1920,
                height: 1080,
                pixel_format: "RGB888",
                exposure_micros: 5_000,
                analogue_gain: 2.0,
                sharpness: 1.0,
                noise_reduction: NoiseReduction::Off,
            },
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "production" => Ok(QualityPreset::Production),
            "high_quality" => Ok(QualityPreset::HighQuality),
            "fast" => Ok(QualityPreset::Fast),
            other => Err(CaptureError::InvalidConfiguration(format!(
                "Unknown quality preset '{}'. Valid presets: production, high_quality, fast.",
                other
            ))),
        }
    }
}

/// Noise reduction tier applied by the ISP, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseReduction {
    Off,
    Minimal,
    High,
}

impl NoiseReduction {
    /// Integer tier as exposed by the sensor stack's control interface.
    pub fn tier(&self) -> u8 {
        match self {
            NoiseReduction::Off => 0,
            NoiseReduction::Minimal => 1,
            NoiseReduction::High => 2,
        }
    }

    /// Value for the still-capture tool's `--denoise` argument.
    pub fn denoise_arg(&self) -> &'static str {
        match self {
            NoiseReduction::Off => "off",
            NoiseReduction::Minimal => "cdn_fast",
            NoiseReduction::High => "cdn_hq",
        }
    }
}

/// Resolved sensor settings for one still capture. Value object, derived
/// purely from a QualityPreset.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureParameters {
    pub width: u32,
    pub height: u32,
    pub pixel_format: &'static str,
    pub exposure_micros: u32,
    pub analogue_gain: f32,
    pub sharpness: f32,
    pub noise_reduction: NoiseReduction,
}

/// Resolve a preset name to its settings. Fails with `InvalidConfiguration`
/// on anything outside the three recognized presets.
pub fn resolve_preset(name: &str) -> Result<(QualityPreset, CaptureParameters), CaptureError> {
    debug!("🎛️ Resolving quality preset '{}'", name);
    let preset = name.parse::<QualityPreset>()?;
    let params = preset.parameters();
    debug!(
        "  Preset '{}' -> {}x{} @ {}us, gain {}, sharpness {}, denoise {}",
        preset,
        params.width,
        params.height,
        params.exposure_micros,
        params.analogue_gain,
        params.sharpness,
        params.noise_reduction.denoise_arg()
    );
    Ok((preset, params))
}
