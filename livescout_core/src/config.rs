//! Discovery settings.
//!
//! Settings are read from YAML at `~/.config/livescout/config.yaml`. Every field
//! has a default, so a missing file or a partial one is fine.

use crate::category::{CategoryRule, DEFAULT_CATEGORY_ID};
use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

// ============================================================================
// Default Values
// ============================================================================

/// Per-query timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// Upper bound on queries per run (seeds + category terms)
pub const DEFAULT_MAX_QUERIES: usize = 8;

/// Cooldown after a fully blocked run, in seconds
pub const DEFAULT_BLOCK_COOLDOWN_SECS: u64 = 300;

pub const DEFAULT_SEARCH_URL: &str = "https://www.youtube.com/results";

/// `sp` value selecting the "Live" search filter.
pub const LIVE_FILTER_PARAM: &str = "EgJAAQ==";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

pub const DEFAULT_REFERER: &str = "https://www.youtube.com/";

pub const DEFAULT_SEED_QUERIES: &[&str] = &["BJ 생방송", "라이브 방송", "실시간 방송", "소통 방송"];

fn default_seed_queries() -> Vec<String> {
    DEFAULT_SEED_QUERIES.iter().map(|s| s.to_string()).collect()
}

fn default_category() -> String {
    DEFAULT_CATEGORY_ID.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_queries() -> usize {
    DEFAULT_MAX_QUERIES
}

fn default_block_cooldown_secs() -> u64 {
    DEFAULT_BLOCK_COOLDOWN_SECS
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}

fn default_true() -> bool {
    true
}

// ============================================================================
// RequestConfig
// ============================================================================

/// Fixed request shape for the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Add the "Live" search filter (`sp`) to every query
    #[serde(default = "default_true")]
    pub live_filter: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            live_filter: true,
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            referer: default_referer(),
        }
    }
}

// ============================================================================
// DiscoveryConfig
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Static search queries issued on every run
    #[serde(default = "default_seed_queries")]
    pub seed_queries: Vec<String>,

    /// Category that sorts first in the ranking
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Per-query timeout in milliseconds (default: 8000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum queries per run (default: 8)
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Cooldown after a run where every query was blocked (default: 300)
    #[serde(default = "default_block_cooldown_secs")]
    pub block_cooldown_secs: u64,

    /// Extra news denylist patterns, on top of the built-in ones
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub news_denylist: Vec<String>,

    #[serde(default)]
    pub request: RequestConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            seed_queries: default_seed_queries(),
            default_category: default_category(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_queries: DEFAULT_MAX_QUERIES,
            block_cooldown_secs: DEFAULT_BLOCK_COOLDOWN_SECS,
            news_denylist: Vec::new(),
            request: RequestConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("livescout").join("config.yaml")
    }

    /// Read a config file. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Read the default config file, falling back to defaults on any problem.
    pub fn load_default() -> Self {
        let path = Self::default_path();
        Self::load(&path).unwrap_or_else(|e| {
            warn!(
                target: "livescout.config",
                path = %path.display(),
                error = %e,
                "ignoring unreadable config file"
            );
            Self::default()
        })
    }

    /// Queries for one run: seeds, then each enabled rule's search terms.
    ///
    /// Trimmed, empties dropped, duplicates removed (first wins), capped at
    /// `max_queries`.
    pub fn build_queries(&self, rules: &[CategoryRule]) -> Vec<String> {
        let category_terms = rules
            .iter()
            .filter(|rule| rule.enabled)
            .flat_map(|rule| rule.search_terms.iter());

        let mut queries: Vec<String> = Vec::new();
        for raw in self.seed_queries.iter().chain(category_terms) {
            let query = raw.trim();
            if query.is_empty() || queries.iter().any(|q| q == query) {
                continue;
            }
            if queries.len() >= self.max_queries {
                break;
            }
            queries.push(query.to_string());
        }
        queries
    }
}
