/// Fixed-width percentage of `current` out of `total`.
///
/// The number is right-aligned to the width of `100` at the requested
/// precision and followed by `%`. When `current == total` a newline is
/// appended so the finished report ends with a blank line once printed.
pub fn format_progress(current: u64, total: u64, decimals: usize) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        current as f64 * 100.0 / total as f64
    };
    let width = if decimals > 0 { 4 + decimals } else { 3 };
    let mut line = format!("{:>width$.prec$}%", percent, width = width, prec = decimals);
    if current == total {
        line.push('\n');
    }
    line
}
