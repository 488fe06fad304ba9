use crate::camera::preset::QualityPreset;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::path::{Path, PathBuf};

/// Date-partitioned subdirectory (`YYYY/MM/DD`) for a capture timestamp.
/// Uses the timestamp's own calendar date, not the wall clock at call time.
pub fn photo_subdirectory(timestamp: &DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("{:04}", timestamp.year()))
        .join(format!("{:02}", timestamp.month()))
        .join(format!("{:02}", timestamp.day()))
}

/// Filename for one capture: `capture_<preset>_<YYYYMMDD>_<HHMMSS>_<mmm>.jpg`.
/// Every component is zero-padded so lexicographic order within one day
/// equals chronological order.
pub fn photo_filename(preset: QualityPreset, timestamp: &DateTime<Local>) -> String {
    format!(
        "capture_{}_{}_{:03}.jpg",
        preset,
        timestamp.format("%Y%m%d_%H%M%S"),
        timestamp.timestamp_subsec_millis()
    )
}

/// Full destination path for a capture. Pure: identical inputs always yield
/// the identical path, so there is never ambiguity about where a given
/// capture was written. Directory creation is the photo store's job.
pub fn derive_capture_path(
    base_dir: &Path,
    timestamp: &DateTime<Local>,
    preset: QualityPreset,
) -> PathBuf {
    base_dir
        .join(photo_subdirectory(timestamp))
        .join(photo_filename(preset, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(ms as i64))
            .unwrap()
    }

    #[test]
    fn subdirectory_is_zero_padded_date() {
        let t = ts(2024, 3, 5, 1, 2, 3, 0);
        assert_eq!(photo_subdirectory(&t), PathBuf::from("2024/03/05"));
    }

    #[test]
    fn filename_embeds_preset_and_millis() {
        let t = ts(2024, 3, 15, 14, 5, 9, 123);
        assert_eq!(
            photo_filename(QualityPreset::Production, &t),
            "capture_production_20240315_140509_123.jpg"
        );
    }

    #[test]
    fn filename_pads_single_digit_millis() {
        let t = ts(2024, 3, 15, 14, 5, 9, 7);
        assert_eq!(
            photo_filename(QualityPreset::Fast, &t),
            "capture_fast_20240315_140509_007.jpg"
        );
    }

    #[test]
    fn derive_capture_path_is_deterministic() {
        let t = ts(2024, 3, 15, 14, 5, 9, 123);
        let base = Path::new("/photos");
        let a = derive_capture_path(base, &t, QualityPreset::Production);
        let b = derive_capture_path(base, &t, QualityPreset::Production);
        assert_eq!(a, b);
        assert_eq!(
            a,
            PathBuf::from("/photos/2024/03/15/capture_production_20240315_140509_123.jpg")
        );
    }

    #[test]
    fn same_day_filenames_sort_chronologically() {
        let times = [
            ts(2024, 3, 15, 0, 0, 0, 0),
            ts(2024, 3, 15, 0, 0, 0, 42),
            ts(2024, 3, 15, 9, 59, 59, 999),
            ts(2024, 3, 15, 10, 0, 0, 0),
            ts(2024, 3, 15, 23, 59, 59, 999),
        ];
        let names: Vec<String> = times
            .iter()
            .map(|t| photo_filename(QualityPreset::Production, t))
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
