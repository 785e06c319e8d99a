//! Initial-state JSON extraction from search result pages.
//!
//! The page embeds its data as a JavaScript assignment, but the exact form
//! varies between responses. Each supported form is a separate strategy; they
//! are tried in order and the first one that yields a JSON object wins.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

/// Pages shorter than this many characters are bot checks or interstitials,
/// never result pages.
pub const MIN_HTML_LEN: usize = 1000;

/// True when `html` has fewer than [`MIN_HTML_LEN`] characters.
///
/// Counts chars, not bytes: a Hangul interstitial is three bytes per character.
pub fn is_short_page(html: &str) -> bool {
    html.chars().take(MIN_HTML_LEN).count() < MIN_HTML_LEN
}

/// `var ytInitialData = {` at the start of a statement.
static VAR_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(?:^|;)[ \t]*var\s+ytInitialData\s*=\s*\{").expect("static regex")
});

/// `window["ytInitialData"] = {`
static WINDOW_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"window\[\s*["']ytInitialData["']\s*\]\s*=\s*\{"#).expect("static regex")
});

static SCRIPT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("static selector"));

type Strategy = fn(&str) -> Option<Value>;

/// Ordered extraction strategies. Order matters: cheaper whole-document scans first.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("var_assignment", from_var_assignment),
    ("window_assignment", from_window_assignment),
    ("script_blocks", from_script_blocks),
];

/// Extract the embedded initial-state object from a result page.
///
/// Returns `None` (never an error) when the page is too short or no strategy
/// produced a parseable object.
pub fn extract_initial_state_json(html: &str) -> Option<Value> {
    extract_with_strategy(html).map(|(_, value)| value)
}

/// Like [`extract_initial_state_json`], also reporting which strategy matched.
pub fn extract_with_strategy(html: &str) -> Option<(&'static str, Value)> {
    if is_short_page(html) {
        debug!(
            target: "livescout.extract",
            chars = html.chars().count(),
            "page below minimum length, skipping extraction"
        );
        return None;
    }

    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(html) {
            debug!(target: "livescout.extract", strategy = *name, "initial state extracted");
            return Some((*name, value));
        }
        debug!(target: "livescout.extract", strategy = *name, "strategy found nothing");
    }
    None
}

fn from_var_assignment(text: &str) -> Option<Value> {
    first_object_after(&VAR_ASSIGNMENT_RE, text)
}

fn from_window_assignment(text: &str) -> Option<Value> {
    first_object_after(&WINDOW_ASSIGNMENT_RE, text)
}

/// Apply the `var` pattern to each `<script>` body on its own, so an assignment
/// that opens a script block (but not a line of the document) is still anchored.
fn from_script_blocks(html: &str) -> Option<Value> {
    let document = Html::parse_document(html);
    document.select(&SCRIPT_SELECTOR).find_map(|script| {
        let body: String = script.text().collect();
        if body.contains("ytInitialData") {
            from_var_assignment(&body)
        } else {
            None
        }
    })
}

/// Try every match of `re` in order; parse the JSON object starting at the
/// match's trailing `{`.
fn first_object_after(re: &Regex, text: &str) -> Option<Value> {
    re.find_iter(text).find_map(|m| {
        // The pattern always ends on the opening brace.
        let start = m.end() - 1;
        parse_leading_object(&text[start..])
    })
}

/// Parse one JSON value from the front of `text`, ignoring whatever follows it
/// (`;`, more script, closing tags). Only objects are accepted.
fn parse_leading_object(text: &str) -> Option<Value> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    match stream.next() {
        Some(Ok(value @ Value::Object(_))) => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn padded(body: &str) -> String {
        // Real pages are large; pad so the length guard does not trip.
        format!(
            "<!DOCTYPE html><html><head><title>t</title></head><body>{}<div>{}</div></body></html>",
            body,
            "x".repeat(MIN_HTML_LEN)
        )
    }

    fn sample() -> Value {
        json!({"contents": {"a": [1, 2, 3]}, "note": "semi;colon"})
    }

    #[test]
    fn test_var_assignment_at_line_start() {
        let html = padded(&format!(
            "<script>\nvar ytInitialData = {};\n</script>",
            sample()
        ));
        let (strategy, value) = extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, "var_assignment");
        assert_eq!(value, sample());
    }

    #[test]
    fn test_window_assignment() {
        let html = padded(&format!(
            r#"<script nonce="abc">window["ytInitialData"] = {};</script>"#,
            sample()
        ));
        let (strategy, value) = extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, "window_assignment");
        assert_eq!(value, sample());
    }

    #[test]
    fn test_script_block_inline_assignment() {
        // Same line as the opening tag: not a statement start in the document.
        let html = padded(&format!(
            r#"<script nonce="abc">var ytInitialData = {};</script>"#,
            sample()
        ));
        let (strategy, value) = extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, "script_blocks");
        assert_eq!(value, sample());
    }

    #[test]
    fn test_semicolon_inside_string_does_not_truncate() {
        let html = padded(&format!("\nvar ytInitialData = {};", sample()));
        let value = extract_initial_state_json(&html).unwrap();
        assert_eq!(value["note"], "semi;colon");
    }

    #[test]
    fn test_broken_json_falls_through_to_next_strategy() {
        let html = padded(&format!(
            "\nvar ytInitialData = {{\"broken\": ;\n<script>window[\"ytInitialData\"] = {};</script>",
            sample()
        ));
        let (strategy, value) = extract_with_strategy(&html).unwrap();
        assert_eq!(strategy, "window_assignment");
        assert_eq!(value, sample());
    }

    #[test]
    fn test_short_page_rejected() {
        let html = format!("\nvar ytInitialData = {};", sample());
        assert!(html.len() < MIN_HTML_LEN);
        assert!(extract_initial_state_json(&html).is_none());
    }

    #[test]
    fn test_short_hangul_page_rejected_by_chars() {
        let html = format!("var ytInitialData = {{\"a\":1}};{}", "가".repeat(380));
        assert!(html.len() > MIN_HTML_LEN);
        assert!(html.chars().count() < MIN_HTML_LEN);
        assert!(is_short_page(&html));
        assert!(extract_initial_state_json(&html).is_none());
    }

    #[test]
    fn test_long_hangul_page_accepted() {
        let html = format!("var ytInitialData = {{\"a\":1}};{}", "가".repeat(MIN_HTML_LEN));
        assert!(!is_short_page(&html));
        assert_eq!(extract_initial_state_json(&html), Some(json!({"a": 1})));
    }

    #[test]
    fn test_no_pattern_returns_none() {
        let html = padded("<script>var somethingElse = {\"a\": 1};</script>");
        assert!(extract_initial_state_json(&html).is_none());
    }

    #[test]
    fn test_garbage_input_does_not_panic() {
        let html = padded("var ytInitialData = {{{{{{ <script>var ytInitialData = [1,2]</script>");
        assert!(extract_initial_state_json(&html).is_none());
        assert!(extract_initial_state_json("").is_none());
    }
}
