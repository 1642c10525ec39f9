//! Text helpers shared by every crate that compares names or parses cells.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalises a name for case- and accent-insensitive comparisons.
///
/// Lowercases, decomposes to NFD and strips the diacritic marks, drops the
/// U+FFFD replacement character left behind by mis-encoded CSV files and
/// collapses runs of whitespace into a single space.
pub fn normalize(value: &str) -> String {
    let folded: String = value
        .trim()
        .to_lowercase()
        .nfd()
        .filter(|c| *c != '\u{FFFD}' && !is_diacritic(*c))
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Combining marks plus the spacing accents and modifier letters that
/// Unicode also flags as diacritics.
fn is_diacritic(c: char) -> bool {
    is_combining_mark(c)
        || matches!(c, '^' | '`' | '\u{A8}' | '\u{AF}' | '\u{B4}' | '\u{B7}' | '\u{B8}' | '\u{2B0}'..='\u{2FF}')
}

/// Parses a number written with `.` as thousands separator and `,` as the
/// decimal point (e.g. `1.234,56`). Blank, malformed or non-finite input
/// yields `None`.
pub fn parse_locale_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical: String = trimmed
        .chars()
        .filter(|c| *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}
