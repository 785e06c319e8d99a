//! Field accessors for a single `videoRenderer` object.
//!
//! Every value can sit in more than one place depending on the response
//! variant, so each field is an ordered chain of accessors. The first accessor
//! returning a non-empty value wins.

use serde_json::Value;

pub type Accessor = fn(&Value) -> Option<String>;

/// Decode a text object: `{"runs": [{"text": ..}, ..]}` or `{"simpleText": ..}`.
pub fn text_of(node: &Value) -> Option<String> {
    if let Some(runs) = node.get("runs").and_then(Value::as_array) {
        let joined: String = runs
            .iter()
            .filter_map(|run| run.get("text").and_then(Value::as_str))
            .collect();
        return non_empty(joined);
    }
    node.get("simpleText")
        .and_then(Value::as_str)
        .and_then(|s| non_empty(s.to_string()))
}

/// Run an accessor chain.
pub fn first_of(item: &Value, chain: &[Accessor]) -> Option<String> {
    chain.iter().find_map(|accessor| accessor(item))
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

fn str_at(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .and_then(|s| non_empty(s.to_string()))
}

fn first_run<'a>(item: &'a Value, key: &str) -> Option<&'a Value> {
    item.get(key)?.get("runs")?.as_array()?.first()
}

// ---------------------------------------------------------------------------
// videoId
// ---------------------------------------------------------------------------

pub const VIDEO_ID: &[Accessor] = &[
    |item| str_at(item, "videoId"),
    |item| {
        item.get("navigationEndpoint")?
            .get("watchEndpoint")
            .and_then(|w| str_at(w, "videoId"))
    },
];

// ---------------------------------------------------------------------------
// title
// ---------------------------------------------------------------------------

pub const TITLE: &[Accessor] = &[
    |item| item.get("title").and_then(text_of),
    |item| {
        item.get("title")?
            .get("accessibility")?
            .get("accessibilityData")
            .and_then(|a| str_at(a, "label"))
    },
    |item| item.get("headline").and_then(text_of),
];

// ---------------------------------------------------------------------------
// channel
// ---------------------------------------------------------------------------

const BYLINE_KEYS: [&str; 3] = ["ownerText", "longBylineText", "shortBylineText"];

pub const CHANNEL_TITLE: &[Accessor] = &[
    |item| first_run(item, BYLINE_KEYS[0]).and_then(|r| str_at(r, "text")),
    |item| first_run(item, BYLINE_KEYS[1]).and_then(|r| str_at(r, "text")),
    |item| first_run(item, BYLINE_KEYS[2]).and_then(|r| str_at(r, "text")),
];

fn browse_id(run: &Value) -> Option<String> {
    run.get("navigationEndpoint")?
        .get("browseEndpoint")
        .and_then(|b| str_at(b, "browseId"))
}

pub const CHANNEL_ID: &[Accessor] = &[
    |item| first_run(item, BYLINE_KEYS[0]).and_then(browse_id),
    |item| first_run(item, BYLINE_KEYS[1]).and_then(browse_id),
    |item| {
        item.get("channelThumbnailSupportedRenderers")?
            .get("channelThumbnailWithLinkRenderer")
            .and_then(browse_id)
    },
];

// ---------------------------------------------------------------------------
// thumbnail
// ---------------------------------------------------------------------------

/// Largest entry of a `{"thumbnails": [{url, width, height}, ..]}` object.
///
/// Entries without dimensions rank below sized ones; among equals the later
/// entry wins, since the upstream lists variants smallest first.
pub fn largest_thumbnail(node: &Value) -> Option<String> {
    node.get("thumbnails")?
        .as_array()?
        .iter()
        .filter_map(|thumb| {
            let url = str_at(thumb, "url")?;
            let width = thumb.get("width").and_then(Value::as_u64).unwrap_or(0);
            let height = thumb.get("height").and_then(Value::as_u64).unwrap_or(0);
            Some((width.saturating_mul(height), url))
        })
        .max_by_key(|(area, _)| *area)
        .map(|(_, url)| url)
}

pub const THUMBNAIL_URL: &[Accessor] = &[
    |item| item.get("thumbnail").and_then(largest_thumbnail),
    |item| {
        item.get("richThumbnail")?
            .get("movingThumbnailRenderer")?
            .get("movingThumbnailDetails")
            .and_then(largest_thumbnail)
    },
];

/// Thumbnail URL derivable from the video id alone.
pub fn fallback_thumbnail(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/hqdefault_live.jpg", video_id)
}

// ---------------------------------------------------------------------------
// counts and times
// ---------------------------------------------------------------------------

pub const VIEW_COUNT_TEXT: &[Accessor] = &[
    |item| item.get("viewCountText").and_then(text_of),
    |item| item.get("shortViewCountText").and_then(text_of),
    |item| {
        item.get("viewCountText")?
            .get("accessibility")?
            .get("accessibilityData")
            .and_then(|a| str_at(a, "label"))
    },
];

pub const PUBLISHED_TEXT: &[Accessor] = &[
    |item| item.get("publishedTimeText").and_then(text_of),
    |item| item.get("dateText").and_then(text_of),
];

pub const LENGTH_TEXT: &[Accessor] = &[
    |item| item.get("lengthText").and_then(text_of),
    |item| {
        item.get("lengthText")?
            .get("accessibility")?
            .get("accessibilityData")
            .and_then(|a| str_at(a, "label"))
    },
];
