//! Core types for discovery runs.

use crate::category::DetectedCategory;
use crate::cpu_pool::ParseTiming;
use crate::error::ScrapeError;
use crate::parser::RawDiscoveredStream;
use crate::viewers::parse_viewer_count;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PLATFORM_YOUTUBE: &str = "youtube";

/// A unique live stream within one run, annotated with its categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLiveStream {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub channel_id: String,
    pub thumbnail_url: String,

    /// Viewer count as displayed (e.g., "1.2천명 시청 중")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_count_raw: Option<String>,

    /// Parsed viewer count; `None` when the text had no leading number
    #[serde(default)]
    pub viewer_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    #[serde(default)]
    pub detected_categories: Vec<DetectedCategory>,

    #[serde(default)]
    pub primary_category_id: Option<String>,
}

impl CanonicalLiveStream {
    /// Text the denylist and category rules are matched against.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.title, self.channel_title)
    }

    pub fn with_categories(mut self, detected: Vec<DetectedCategory>) -> Self {
        self.primary_category_id = detected.first().map(|d| d.category_id.clone());
        self.detected_categories = detected;
        self
    }
}

impl From<RawDiscoveredStream> for CanonicalLiveStream {
    fn from(raw: RawDiscoveredStream) -> Self {
        let viewer_count = raw.viewer_count_raw.as_deref().and_then(parse_viewer_count);
        Self {
            video_id: raw.video_id,
            title: raw.title,
            channel_title: raw.channel_title,
            channel_id: raw.channel_id,
            thumbnail_url: raw.thumbnail_url,
            viewer_count_raw: raw.viewer_count_raw,
            viewer_count,
            published_at: raw.published_at,
            detected_categories: Vec::new(),
            primary_category_id: None,
        }
    }
}

/// A stream as handed to the site's API layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStreamRecord {
    /// Video id
    pub id: String,

    /// Channel title
    pub name: String,

    pub platform: String,
    pub thumbnail_url: String,
    pub channel_url: Option<String>,
    pub stream_url: String,
    pub title: String,
    pub viewer_count: Option<u64>,

    /// Published-time text as shown upstream, when present
    pub started_at: Option<String>,

    pub detected_categories: Vec<DetectedCategory>,
    pub primary_category_id: Option<String>,
}

impl From<&CanonicalLiveStream> for LiveStreamRecord {
    fn from(stream: &CanonicalLiveStream) -> Self {
        let channel_url = if stream.channel_id.is_empty() {
            None
        } else {
            Some(format!(
                "https://www.youtube.com/channel/{}",
                stream.channel_id
            ))
        };
        Self {
            id: stream.video_id.clone(),
            name: stream.channel_title.clone(),
            platform: PLATFORM_YOUTUBE.to_string(),
            thumbnail_url: stream.thumbnail_url.clone(),
            channel_url,
            stream_url: format!("https://www.youtube.com/watch?v={}", stream.video_id),
            title: stream.title.clone(),
            viewer_count: stream.viewer_count,
            started_at: stream.published_at.clone(),
            detected_categories: stream.detected_categories.clone(),
            primary_category_id: stream.primary_category_id.clone(),
        }
    }
}

/// Failure details for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryError {
    pub query: String,

    /// Error message
    pub error: String,

    /// Stable error code (see `ScrapeError::code_str`)
    pub code: String,

    #[serde(default)]
    pub is_timeout: bool,
}

impl QueryError {
    pub fn new(query: impl Into<String>, err: &ScrapeError) -> Self {
        Self {
            query: query.into(),
            error: err.to_string(),
            code: err.code_str().to_string(),
            is_timeout: err.is_timeout(),
        }
    }
}

/// Outcome of one discovery run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// Unique, classified streams (ranked when produced by `run`)
    pub streams: Vec<CanonicalLiveStream>,

    /// Queries issued, in order
    pub queries: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,

    /// Live items parsed across all queries, before dedup
    pub raw_items: usize,

    /// Items dropped as duplicates of an earlier `video_id`
    pub duplicates: usize,

    /// Items dropped by the news denylist
    pub denylisted: usize,

    /// True when the run was short-circuited by an upstream cooldown
    #[serde(default)]
    pub skipped: bool,

    /// Parse-pool queue and run time summed over successful queries
    #[serde(default)]
    pub parse_timing: ParseTiming,

    pub duration_ms: u64,

    pub generated_at: DateTime<Utc>,
}

impl DiscoveryReport {
    pub fn new(queries: Vec<String>) -> Self {
        Self {
            streams: Vec::new(),
            queries,
            errors: Vec::new(),
            raw_items: 0,
            duplicates: 0,
            denylisted: 0,
            skipped: false,
            parse_timing: ParseTiming::default(),
            duration_ms: 0,
            generated_at: Utc::now(),
        }
    }

    /// An empty report for a run that never went upstream.
    pub fn skipped(queries: Vec<String>) -> Self {
        Self {
            skipped: true,
            ..Self::new(queries)
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if every issued query failed.
    pub fn all_failed(&self) -> bool {
        !self.queries.is_empty() && self.errors.len() >= self.queries.len()
    }

    pub fn records(&self) -> Vec<LiveStreamRecord> {
        self.streams.iter().map(LiveStreamRecord::from).collect()
    }
}
