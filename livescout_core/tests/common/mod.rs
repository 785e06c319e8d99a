#![allow(dead_code)]

use async_trait::async_trait;
use livescout_core::{ScrapeError, SearchPageFetcher};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A live `videoRenderer` entry as it appears in a result list.
pub fn live_item(id: &str, title: &str, channel: &str, viewers: &str) -> Value {
    json!({"videoRenderer": {
        "videoId": id,
        "title": {"runs": [{"text": title}]},
        "ownerText": {"runs": [{
            "text": channel,
            "navigationEndpoint": {"browseEndpoint": {"browseId": format!("UC{}", id)}}
        }]},
        "thumbnail": {"thumbnails": [
            {"url": format!("https://i.ytimg.com/vi/{}/default.jpg", id), "width": 120, "height": 90},
            {"url": format!("https://i.ytimg.com/vi/{}/hq720_live.jpg", id), "width": 720, "height": 404}
        ]},
        "viewCountText": {"simpleText": viewers},
        "badges": [{"metadataBadgeRenderer": {"style": "BADGE_STYLE_TYPE_LIVE_NOW", "label": "LIVE"}}]
    }})
}

/// A finished upload; never reported as live.
pub fn vod_item(id: &str, title: &str) -> Value {
    json!({"videoRenderer": {
        "videoId": id,
        "title": {"simpleText": title},
        "lengthText": {"simpleText": "12:34"},
        "viewCountText": {"simpleText": "조회수 1,000회"}
    }})
}

/// A search result page embedding `items` the way the live site does.
pub fn search_page_html(items: Vec<Value>) -> String {
    let data = json!({"contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {
        "sectionListRenderer": {"contents": [{"itemSectionRenderer": {"contents": items}}]}
    }}}});
    page_with_script(&format!("var ytInitialData = {};", data))
}

/// A full-size page without any initial state.
pub fn page_without_data() -> String {
    page_with_script("window.ytcfg = {};")
}

fn page_with_script(script: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>YouTube</title><style>{}</style></head>\
         <body><script nonce=\"abc\">{}</script></body></html>",
        "body{margin:0}".repeat(100),
        script
    )
}

pub enum Reply {
    Page(String),
    Fail(fn() -> ScrapeError),
    Hang,
}

/// Fetcher serving canned replies keyed by query.
pub struct MockFetcher {
    replies: HashMap<String, Reply>,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn page(mut self, query: &str, items: Vec<Value>) -> Self {
        self.replies
            .insert(query.to_string(), Reply::Page(search_page_html(items)));
        self
    }

    pub fn reply(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), reply);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchPageFetcher for MockFetcher {
    async fn fetch_search_page(&self, query: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(query) {
            Some(Reply::Page(html)) => Ok(html.clone()),
            Some(Reply::Fail(make)) => Err(make()),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(String::new())
            }
            None => Err(ScrapeError::UpstreamStatus(404)),
        }
    }
}
