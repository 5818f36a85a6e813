//! Elapsed-time text formatting.

/// Format an elapsed position in seconds as `h:mm:ss` (or `m:ss` below an
/// hour) for display next to a progress bar.
///
/// Degenerate input (NaN, infinite, negative) formats as `0:00`.
pub fn format_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let h = total / 3600;
    let m = total % 3600 / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
