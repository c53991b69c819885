const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

/// Scales a byte count to the largest binary unit it reaches. A value
/// exactly on a threshold takes that unit (1048576 is 1.00 MB, not
/// 1024.00 KB); anything below 1 KB passes through unchanged.
pub fn format_bytes(size_in_bytes: f64) -> (f64, &'static str) {
    if size_in_bytes >= GB {
        (size_in_bytes / GB, "GB")
    } else if size_in_bytes >= MB {
        (size_in_bytes / MB, "MB")
    } else if size_in_bytes >= KB {
        (size_in_bytes / KB, "KB")
    } else {
        (size_in_bytes, "bytes")
    }
}
