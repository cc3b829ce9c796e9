use std::time::{SystemTime, UNIX_EPOCH};

/// `<epoch-ms>-<pid>`; unique enough to tell runs apart in shared logs.
pub(crate) fn build_run_id() -> String {
    format!("{}-{}", current_time_ms(), std::process::id())
}

fn current_time_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
