//! Column helpers that measure display width rather than byte length.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width of the heavy section banners.
pub const BANNER_WIDTH: usize = 120;

/// A line made of `width` copies of `c`.
pub fn rule(c: char, width: usize) -> String {
    std::iter::repeat(c).take(width).collect()
}

/// Three-line section banner: `=` rule, title, `=` rule.
pub fn banner(title: &str) -> Vec<String> {
    vec![
        rule('=', BANNER_WIDTH),
        title.to_string(),
        rule('=', BANNER_WIDTH),
    ]
}

/// Cut `s` so it occupies at most `width` columns.
pub fn truncate(s: &str, width: usize) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Left-align `s` in a `width`-column cell, truncating when too long.
pub fn pad_right(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

/// Right-align `s` in a `width`-column cell. Longer values are kept whole.
pub fn pad_left(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", " ".repeat(fill), s)
}
