//! Discovery execution engine.
//!
//! Fans search queries out in parallel, then merges, filters and classifies
//! what comes back.

use super::{CanonicalLiveStream, DiscoveryReport, QueryError, UpstreamState};
use crate::category::{CategoryMatcher, CategoryRule};
use crate::config::DiscoveryConfig;
use crate::cpu_pool::{parse_search_page, ParsedPage};
use crate::denylist::NewsDenylist;
use crate::error::ScrapeError;
use crate::fetch::{SearchPageFetcher, YouTubeSearchFetcher};
use crate::parser::RawDiscoveredStream;
use crate::rank::rank;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Engine for discovering live streams across a set of search queries.
pub struct LiveDiscovery {
    fetcher: Arc<dyn SearchPageFetcher>,
    rules: Vec<CategoryRule>,
    matcher: CategoryMatcher,
    denylist: NewsDenylist,
    config: DiscoveryConfig,
}

impl LiveDiscovery {
    /// Create an engine over `fetcher`. Invalid rule patterns are logged and
    /// never match.
    pub fn new(
        fetcher: Arc<dyn SearchPageFetcher>,
        rules: Vec<CategoryRule>,
        config: DiscoveryConfig,
    ) -> Self {
        let matcher = CategoryMatcher::new(&rules);
        let denylist = NewsDenylist::with_extra(&config.news_denylist);
        Self {
            fetcher,
            rules,
            matcher,
            denylist,
            config,
        }
    }

    /// Create an engine that fetches from YouTube.
    pub fn youtube(rules: Vec<CategoryRule>, config: DiscoveryConfig) -> Result<Self, ScrapeError> {
        let fetcher = YouTubeSearchFetcher::new(config.request.clone())?;
        Ok(Self::new(Arc::new(fetcher), rules, config))
    }

    /// Replace the news denylist.
    pub fn with_denylist(mut self, denylist: NewsDenylist) -> Self {
        self.denylist = denylist;
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Queries a configured run would issue.
    pub fn queries(&self) -> Vec<String> {
        self.config.build_queries(&self.rules)
    }

    /// Build queries, discover and rank.
    pub async fn run(&self, state: &mut UpstreamState) -> DiscoveryReport {
        let queries = self.queries();
        let mut report = self.discover(&queries, state).await;
        report.streams = rank(
            std::mem::take(&mut report.streams),
            &self.config.default_category,
        );
        report
    }

    /// Unique, classified streams for `queries`, in merge order.
    ///
    /// Never fails: failed queries contribute nothing.
    pub async fn discover_live_streams(&self, queries: &[String]) -> Vec<CanonicalLiveStream> {
        let mut state = UpstreamState::new();
        self.discover(queries, &mut state).await.streams
    }

    /// Run `queries` concurrently and merge the results.
    ///
    /// Returns an empty, `skipped` report without going upstream while
    /// `state` is cooling down. A run in which every query was blocked arms
    /// the cooldown; any successful query clears it.
    pub async fn discover(&self, queries: &[String], state: &mut UpstreamState) -> DiscoveryReport {
        let start = Instant::now();
        let now = Utc::now();

        if state.is_cooling_down(now) {
            info!(
                target: "livescout.discovery",
                remaining_secs = state.remaining_secs(now),
                "upstream cooling down, skipping run"
            );
            return DiscoveryReport::skipped(queries.to_vec());
        }

        let outcomes = self.fetch_all(queries).await;
        let mut report = DiscoveryReport::new(queries.to_vec());
        let mut seen: HashSet<String> = HashSet::new();
        let mut succeeded = 0usize;
        let mut blocked = 0usize;

        for (query, outcome) in queries.iter().zip(outcomes) {
            let items = match outcome {
                Ok(page) => {
                    succeeded += 1;
                    report.parse_timing.add(page.timing);
                    page.items
                }
                Err(err) => {
                    if err.is_block() {
                        blocked += 1;
                    }
                    warn!(
                        target: "livescout.discovery",
                        query = %query,
                        code = err.code_str(),
                        error = %err,
                        "query failed"
                    );
                    report.errors.push(QueryError::new(query.as_str(), &err));
                    continue;
                }
            };

            report.raw_items += items.len();
            for item in items {
                if !seen.insert(item.video_id.clone()) {
                    report.duplicates += 1;
                    continue;
                }
                if let Some(stream) = self.admit(item) {
                    report.streams.push(stream);
                } else {
                    report.denylisted += 1;
                }
            }
        }

        if succeeded > 0 {
            state.reset();
        } else if !queries.is_empty() && blocked == queries.len() {
            state.record_block(now, self.config.block_cooldown_secs);
            warn!(
                target: "livescout.discovery",
                cooldown_secs = self.config.block_cooldown_secs,
                blocked_runs = state.consecutive_blocked_runs,
                "every query was blocked, cooling down"
            );
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            target: "livescout.discovery",
            queries = queries.len(),
            failed = report.errors.len(),
            raw_items = report.raw_items,
            duplicates = report.duplicates,
            denylisted = report.denylisted,
            streams = report.streams.len(),
            parse_wait_ms = report.parse_timing.wait_ms,
            parse_ms = report.parse_timing.run_ms,
            duration_ms = report.duration_ms,
            "discovery run complete"
        );
        report
    }

    /// Denylist check, then classification. `None` means the item was vetoed.
    fn admit(&self, item: RawDiscoveredStream) -> Option<CanonicalLiveStream> {
        let stream = CanonicalLiveStream::from(item);
        let text = stream.match_text();
        if let Some(pattern) = self.denylist.matched_pattern(&text) {
            debug!(
                target: "livescout.discovery",
                video_id = %stream.video_id,
                pattern = %pattern,
                "dropped by news denylist"
            );
            return None;
        }
        let detected = self.matcher.match_text(&text);
        Some(stream.with_categories(detected))
    }

    /// One result per query, in query order.
    async fn fetch_all(&self, queries: &[String]) -> Vec<Result<ParsedPage, ScrapeError>> {
        let timeout_ms = self.config.timeout_ms;

        let futures: Vec<_> = queries
            .iter()
            .map(|query| {
                let fetcher = Arc::clone(&self.fetcher);
                let query = query.clone();

                async move {
                    let start = Instant::now();
                    let search = search_single_query(fetcher, query.clone());

                    match timeout(Duration::from_millis(timeout_ms), search).await {
                        Ok(Ok(page)) => {
                            debug!(
                                target: "livescout.discovery",
                                query = %query,
                                items = page.items.len(),
                                strategy = page.strategy,
                                parse_wait_ms = page.timing.wait_ms,
                                parse_ms = page.timing.run_ms,
                                latency_ms = start.elapsed().as_millis() as u64,
                                "query complete"
                            );
                            Ok(page)
                        }
                        Ok(Err(err)) => Err(err),
                        Err(_) => Err(ScrapeError::Timeout(format!(
                            "query timed out after {}ms",
                            timeout_ms
                        ))),
                    }
                }
            })
            .collect();

        futures::future::join_all(futures).await
    }
}

/// Fetch one result page and parse its live items on the parse pool.
async fn search_single_query(
    fetcher: Arc<dyn SearchPageFetcher>,
    query: String,
) -> Result<ParsedPage, ScrapeError> {
    let html = fetcher.fetch_search_page(&query).await?;
    parse_search_page(html).await
}
