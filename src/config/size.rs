use crate::error::{PurgeError, Result};

/// Parse a size string like "512M", "1G", "1024K" into bytes
pub(crate) fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();

    if s.starts_with('-') {
        return Err(PurgeError::InvalidMemoryLimit(
            s.to_string(),
            "Size cannot be negative".to_string(),
        ));
    }

    if let Ok(bytes) = s.parse::<u64>() {
        return Ok(bytes);
    }

    let (num_part, suffix) = split_number_suffix(s)?;
    let multiplier = match suffix.to_uppercase().as_str() {
        "B" | "" => 1,
        "K" | "KB" | "KIB" => 1024,
        "M" | "MB" | "MIB" => 1024 * 1024,
        "G" | "GB" | "GIB" => 1024 * 1024 * 1024,
        _ => {
            return Err(PurgeError::InvalidMemoryLimit(
                s.to_string(),
                format!("Unknown size suffix: {suffix}"),
            ));
        }
    };

    let base: f64 = num_part.parse().map_err(|_| {
        PurgeError::InvalidMemoryLimit(s.to_string(), "Invalid number format".to_string())
    })?;

    Ok((base * multiplier as f64) as u64)
}

fn split_number_suffix(s: &str) -> Result<(&str, &str)> {
    let split_pos = s
        .char_indices()
        .find(|(_, ch)| ch.is_alphabetic())
        .map_or(s.len(), |(i, _)| i);

    let (num, suffix) = s.split_at(split_pos);
    if num.is_empty() {
        return Err(PurgeError::InvalidMemoryLimit(
            s.to_string(),
            "No number found".to_string(),
        ));
    }

    Ok((num, suffix))
}

/// Format size in human-readable format
pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("128K").unwrap(), 128 * 1024);
        assert_eq!(parse_size("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_size("512mb").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size(" 2GiB ").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(
            parse_size("1.5G").unwrap(),
            (1.5 * 1024.0 * 1024.0 * 1024.0) as u64
        );

        assert!(parse_size("").is_err());
        assert!(parse_size("-2").is_err());
        assert!(parse_size("-5M").is_err());
        assert!(parse_size("lots").is_err());
        assert!(matches!(
            parse_size("64X"),
            Err(PurgeError::InvalidMemoryLimit(..))
        ));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(512 * 1024 * 1024), "512.0 MiB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GiB");
    }
}
