use chrono::{DateTime, Local};

// Capture timestamps use the local clock, matching the dates a person
// browsing the photo tree expects.
pub fn current_local_timestamp() -> DateTime<Local> {
    Local::now()
}
