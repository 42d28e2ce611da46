//! Human-readable byte sizes.

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;

/// Format a byte count for display.
///
/// ```
/// use ktxarray::config::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(32 * 1024 * 1024), "32.0 MB");
/// ```
pub fn format_size(bytes: usize) -> String {
    let value = bytes as f64;
    if value >= GB {
        format!("{:.1} GB", value / GB)
    } else if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Parse a byte count such as `1048576`, `32MB`, `1.5 GiB` or `512k`.
///
/// Units are binary (1 KB = 1024 bytes). Returns `None` for malformed or
/// negative input.
pub fn parse_size(input: &str) -> Option<usize> {
    let input = input.trim();
    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    let multiplier = match unit.trim().to_lowercase().as_str() {
        "" | "b" => 1.0,
        "k" | "kb" | "kib" => KB,
        "m" | "mb" | "mib" => MB,
        "g" | "gb" | "gib" => GB,
        _ => return None,
    };

    let value: f64 = number.parse().ok()?;
    let bytes = (value * multiplier).round();
    if !bytes.is_finite() || bytes < 0.0 || bytes > usize::MAX as f64 {
        return None;
    }
    Some(bytes as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096"), Some(4096));
        assert_eq!(parse_size("32MB"), Some(32 * 1024 * 1024));
        assert_eq!(parse_size("1 MiB"), Some(1024 * 1024));
        assert_eq!(parse_size("1.5gb"), Some(1536 * 1024 * 1024));
        assert_eq!(parse_size("512k"), Some(512 * 1024));
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert_eq!(parse_size(""), None);
        assert_eq!(parse_size("MB"), None);
        assert_eq!(parse_size("12 parsecs"), None);
        assert_eq!(parse_size("-5MB"), None);
    }
}
