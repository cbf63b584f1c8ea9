use std::fmt::Write;

use chrono::Timelike;

/// Wall-clock time as HH:MM:SS.
pub fn format_clock<T: Timelike>(time: &T) -> String {
    let mut out = String::with_capacity(8);
    let _ = write!(
        out,
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    );
    out
}

/// Group digits in threes (e.g. 1234567 -> "1,234,567").
pub fn format_points(points: u64) -> String {
    let digits = points.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
