use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Elapsed seconds as `H:M:S`.
///
/// Hours are unbounded; minutes and seconds come from what is left after
/// removing whole hours and are not zero-padded (`3661` is `"1:1:1"`).
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let remainder = seconds - hours * 3600;
    let minutes = remainder / 60;
    let secs = remainder - minutes * 60;
    format!("{hours}:{minutes}:{secs}")
}

/// Resident memory given in kB, scaled for display.
pub fn format_kb(kb: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kb >= GB {
        format!("{:.1} GB", kb as f64 / GB as f64)
    } else if kb >= MB {
        format!("{:.1} MB", kb as f64 / MB as f64)
    } else {
        format!("{kb} KB")
    }
}

/// A ratio as a percentage with one decimal, `1.0` is `"100.0%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}
