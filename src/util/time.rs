use std::time::Duration;

use jiff::Timestamp;

/// Get the current UTC date and time as a string
pub fn time_now_utc() -> String {
    Timestamp::now().to_string()
}

/// Format an elapsed duration as seconds with two decimal places.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}", elapsed.as_secs_f64())
}
