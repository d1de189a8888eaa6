//! Display helpers for the detail view.

use chrono::{DateTime, Local};

pub fn format_file_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    let gb = mb / 1024.0;
    if gb >= 1.0 {
        format!("{:.2} GB", gb)
    } else if mb >= 1.0 {
        format!("{:.2} MB", mb)
    } else if kb >= 1.0 {
        format!("{:.2} KB", kb)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Epoch milliseconds as local `dd.mm.yyyy HH:MM`.
pub fn format_timestamp(millis: i64) -> String {
    match DateTime::from_timestamp_millis(millis) {
        Some(dt) => dt.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Last dot-separated segment, e.g. `android.permission.CAMERA` -> `CAMERA`.
pub fn short_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
