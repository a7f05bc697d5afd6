//! Human-readable sizes and ratios for the result panel.

const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
const STEP: u128 = 1024;

/// Format a byte count with two decimals in the largest fitting unit.
///
/// The unit index is `floor(log_1024(bytes))`, capped at megabytes, so a
/// 5 GiB file reads `"5120.00 MB"`. Halves round up. Zero is the literal
/// `"0 Bytes"`.
///
/// ```ignore
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let bytes = u128::from(bytes);
    let mut unit = 0;
    let mut divisor = 1u128;
    while unit + 1 < UNITS.len() && bytes >= divisor * STEP {
        divisor *= STEP;
        unit += 1;
    }

    // Integer rounding keeps ties exact (1152 bytes is 1.125 KB -> "1.13 KB").
    let hundredths = (bytes * 200 + divisor) / (divisor * 2);
    format!("{}.{:02} {}", hundredths / 100, hundredths % 100, UNITS[unit])
}

/// Percentage of the original size saved by compression.
///
/// Negative when the output grew. Zero when the original is empty.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}
