//! Localized viewer-count parsing ("1.2천명 시청 중" -> 1200).
//!
//! Korean units are the primary form. English-locale responses abbreviate with
//! `K`/`M` ("1.2K watching"), which are accepted too.

use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_COUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<num>\d[\d,]*(?:\.\d+)?)\s*(?P<unit>[천만억]|[KkMm]\b)?").expect("static regex")
});

fn unit_scale(unit: &str) -> f64 {
    match unit {
        "천" => 1_000.0,
        "만" => 10_000.0,
        "억" => 100_000_000.0,
        "K" | "k" => 1_000.0,
        "M" | "m" => 1_000_000.0,
        _ => 1.0,
    }
}

/// Parse a viewer count with an optional magnitude suffix.
///
/// Returns `None` when the text does not start with a number.
pub fn parse_viewer_count(text: &str) -> Option<u64> {
    let caps = LEADING_COUNT_RE.captures(text.trim())?;
    let number: f64 = caps["num"].replace(',', "").parse().ok()?;
    let scale = caps.name("unit").map(|m| unit_scale(m.as_str())).unwrap_or(1.0);
    let value = (number * scale).round();
    if value.is_finite() && value >= 0.0 {
        Some(value as u64)
    } else {
        None
    }
}
