use chrono::{Local, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn current_time_in_secs() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Local wall-clock time as written to the log worksheet.
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
