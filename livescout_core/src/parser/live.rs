//! "Is this item broadcasting right now" heuristics.
//!
//! Any single signal is enough. The upstream marks live items inconsistently
//! across layouts, so the checks overlap.

use super::fields::{first_of, LENGTH_TEXT};
use serde_json::Value;

const LIVE_LABELS: &[&str] = &["LIVE", "LIVE NOW", "실시간"];
const LIVE_BADGE_STYLE: &str = "BADGE_STYLE_TYPE_LIVE_NOW";
const LIVE_OVERLAY_STYLE: &str = "LIVE";
const WATCHING_PHRASES: &[&str] = &["watching", "시청 중", "시청중"];

type LiveSignal = fn(&Value) -> bool;

pub const LIVE_SIGNALS: &[(&str, LiveSignal)] = &[
    ("badge", has_live_badge),
    ("length_text", has_live_length_text),
    ("thumbnail_overlay", has_live_overlay),
];

pub fn is_live(item: &Value) -> bool {
    live_signal(item).is_some()
}

/// Name of the first signal that marks `item` as live.
pub fn live_signal(item: &Value) -> Option<&'static str> {
    LIVE_SIGNALS
        .iter()
        .find(|(_, signal)| signal(item))
        .map(|(name, _)| *name)
}

fn has_live_badge(item: &Value) -> bool {
    let Some(badges) = item.get("badges").and_then(Value::as_array) else {
        return false;
    };
    badges.iter().any(|badge| {
        if badge.get("liveBadgeRenderer").is_some() {
            return true;
        }
        let Some(renderer) = badge.get("metadataBadgeRenderer") else {
            return false;
        };
        let label_is_live = renderer
            .get("label")
            .and_then(Value::as_str)
            .map(|label| LIVE_LABELS.iter().any(|l| label.trim().eq_ignore_ascii_case(l)))
            .unwrap_or(false);
        let style_is_live = renderer.get("style").and_then(Value::as_str) == Some(LIVE_BADGE_STYLE);
        label_is_live || style_is_live
    })
}

/// Live items have no fixed duration; some variants put "N watching" there instead.
fn has_live_length_text(item: &Value) -> bool {
    match first_of(item, LENGTH_TEXT) {
        None => true,
        Some(text) => {
            let lower = text.to_lowercase();
            WATCHING_PHRASES.iter().any(|p| lower.contains(p))
        }
    }
}

fn has_live_overlay(item: &Value) -> bool {
    item.get("thumbnailOverlays")
        .and_then(Value::as_array)
        .map(|overlays| {
            overlays.iter().any(|overlay| {
                overlay
                    .get("thumbnailOverlayTimeStatusRenderer")
                    .and_then(|r| r.get("style"))
                    .and_then(Value::as_str)
                    == Some(LIVE_OVERLAY_STYLE)
            })
        })
        .unwrap_or(false)
}
