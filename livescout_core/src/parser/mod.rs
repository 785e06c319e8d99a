//! Live item parsing from the extracted initial-state JSON.
//!
//! - `paths`: where result items live in the tree
//! - `live`: which items are broadcasting now
//! - `fields`: how each output field is read off an item

pub mod fields;
pub mod live;
pub mod paths;

use fields::{
    fallback_thumbnail, first_of, CHANNEL_ID, CHANNEL_TITLE, PUBLISHED_TEXT, THUMBNAIL_URL, TITLE,
    VIDEO_ID, VIEW_COUNT_TEXT,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A live item as found on a result page, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDiscoveredStream {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    pub thumbnail_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_count_raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// Renderer keys that wrap a single video in result lists.
const VIDEO_RENDERER_KEYS: &[&str] = &["videoRenderer", "compactVideoRenderer", "gridVideoRenderer"];

/// Extract every currently-live video from a parsed result page.
///
/// Malformed or non-video entries are skipped; whatever can be read is returned.
pub fn extract_live_items(data: &Value) -> Vec<RawDiscoveredStream> {
    let (path, entries) = paths::find_items(data);
    let total = entries.len();

    let items: Vec<RawDiscoveredStream> = entries
        .into_iter()
        .filter_map(video_renderer)
        .filter(|renderer| live::is_live(renderer))
        .filter_map(parse_item)
        .collect();

    debug!(
        target: "livescout.parser",
        path = path.unwrap_or("none"),
        entries = total,
        live = items.len(),
        "parsed result items"
    );
    items
}

fn video_renderer(entry: &Value) -> Option<&Value> {
    VIDEO_RENDERER_KEYS
        .iter()
        .find_map(|key| entry.get(*key))
        .filter(|renderer| renderer.is_object())
}

/// Normalize one live renderer; `None` when the id or title is missing.
pub fn parse_item(renderer: &Value) -> Option<RawDiscoveredStream> {
    let video_id = first_of(renderer, VIDEO_ID)?;
    let title = first_of(renderer, TITLE)?;

    let thumbnail_url =
        first_of(renderer, THUMBNAIL_URL).unwrap_or_else(|| fallback_thumbnail(&video_id));

    Some(RawDiscoveredStream {
        channel_title: first_of(renderer, CHANNEL_TITLE).unwrap_or_default(),
        channel_id: first_of(renderer, CHANNEL_ID).unwrap_or_default(),
        thumbnail_url,
        viewer_count_raw: first_of(renderer, VIEW_COUNT_TEXT),
        published_at: first_of(renderer, PUBLISHED_TEXT),
        video_id,
        title,
    })
}
