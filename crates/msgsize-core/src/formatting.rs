//! Number formatting helpers shared by the report sections.

/// Format a number with thousands separators and a fixed number of decimal
/// places.
///
/// # Examples
///
/// ```
/// use msgsize_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut result = group_thousands(int_part);
    if let Some(frac) = frac_part {
        result.push('.');
        result.push_str(frac);
    }

    // "-0.0" after rounding is printed without the sign.
    let is_zero = formatted.bytes().all(|b| b == b'0' || b == b'.');
    if value < 0.0 && !is_zero {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an integer byte count with thousands separators.
///
/// ```
/// use msgsize_core::formatting::format_count;
///
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a byte size, switching to kilobytes at 1024 bytes.
///
/// ```
/// use msgsize_core::formatting::format_size;
///
/// assert_eq!(format_size(512.0), "512.0 B");
/// assert_eq!(format_size(2048.0), "2.00 KB");
/// ```
pub fn format_size(bytes: f64) -> String {
    if bytes >= 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{:.1} B", bytes)
    }
}

/// Format a difference with an explicit sign, e.g. `"+4.0"` / `"-10.0"`.
pub fn format_signed(value: f64, decimals: usize) -> String {
    if value > 0.0 {
        format!("+{}", format_number(value, decimals))
    } else {
        format_number(value, decimals)
    }
}

/// Calculate `(part / whole) * 100`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    part / whole * 100.0
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
