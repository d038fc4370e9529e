pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes.max(0.0);
    let mut unit = 0usize;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{value:.0} {}", UNITS[unit])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

/// Leading characters of a public key, enough to tell peers apart on screen.
pub fn short_key(public_key: &str) -> &str {
    const SHORT_KEY_LEN: usize = 12;

    public_key.get(..SHORT_KEY_LEN).unwrap_or(public_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pick_the_largest_unit() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(1536.0), "1.50 KiB");
        assert_eq!(format_bytes(3.0 * 1024.0 * 1024.0 * 1024.0), "3.00 GiB");
        assert_eq!(format_bytes(-8.0), "0 B");
    }

    #[test]
    fn short_key_truncates_long_keys_only() {
        assert_eq!(short_key("4c69624e61434c504b3a"), "4c69624e6143");
        assert_eq!(short_key("abc"), "abc");
    }
}
