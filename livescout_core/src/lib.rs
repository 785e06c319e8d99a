// src/lib.rs
pub mod category;
pub mod config;
pub mod cpu_pool;
pub mod denylist;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod parser;
pub mod rank;
pub mod viewers;

pub use crate::category::{
    builtin_rules, match_categories, primary_category, CategoryMatcher, CategoryRule,
    DetectedCategory, RuleStore, RuleStoreError, DEFAULT_CATEGORY_ID,
};
pub use crate::config::{DiscoveryConfig, RequestConfig};
pub use crate::denylist::NewsDenylist;
pub use crate::discovery::{
    CanonicalLiveStream, DiscoveryReport, LiveDiscovery, LiveStreamRecord, QueryError,
    UpstreamState,
};
pub use crate::error::ScrapeError;
pub use crate::extract::extract_initial_state_json;
pub use crate::fetch::{SearchPageFetcher, YouTubeSearchFetcher};
pub use crate::parser::{extract_live_items, RawDiscoveredStream};
pub use crate::rank::rank;
pub use crate::viewers::parse_viewer_count;
