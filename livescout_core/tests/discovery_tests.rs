mod common;

use chrono::{Duration as ChronoDuration, Utc};
use common::{live_item, page_without_data, vod_item, MockFetcher, Reply};
use livescout_core::cpu_pool::ParseTiming;
use livescout_core::{
    builtin_rules, CategoryRule, DiscoveryConfig, LiveDiscovery, ScrapeError, UpstreamState,
};
use std::sync::Arc;

fn queries(items: &[&str]) -> Vec<String> {
    items.iter().map(|q| q.to_string()).collect()
}

fn engine(fetcher: Arc<MockFetcher>, config: DiscoveryConfig) -> LiveDiscovery {
    LiveDiscovery::new(fetcher, builtin_rules().to_vec(), config)
}

fn fast_config() -> DiscoveryConfig {
    DiscoveryConfig {
        timeout_ms: 2_000,
        ..DiscoveryConfig::default()
    }
}

#[tokio::test]
async fn test_dedup_across_queries_first_wins() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .page("q1", vec![live_item("abc123", "첫번째 제목", "채널", "10명 시청 중")])
            .page(
                "q2",
                vec![
                    live_item("abc123", "두번째 제목", "채널", "20명 시청 중"),
                    live_item("other", "다른 방송", "채널", "5명 시청 중"),
                ],
            ),
    );
    let discovery = engine(fetcher.clone(), fast_config());
    let mut state = UpstreamState::new();

    let report = discovery.discover(&queries(&["q1", "q2"]), &mut state).await;

    let matching: Vec<_> = report
        .streams
        .iter()
        .filter(|s| s.video_id == "abc123")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].title, "첫번째 제목");
    assert_eq!(matching[0].viewer_count, Some(10));
    assert_eq!(report.streams.len(), 2);
    assert_eq!(report.raw_items, 3);
    assert_eq!(report.duplicates, 1);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_failed_query_does_not_affect_siblings() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .page("a", vec![live_item("a1", "첫 방송", "스트리머 하나", "1명")])
            .reply("broken", Reply::Fail(|| ScrapeError::UpstreamStatus(500)))
            .page("c", vec![live_item("c1", "셋째 방송", "스트리머 셋", "2명")]),
    );
    let discovery = engine(fetcher, fast_config());

    let report = discovery
        .discover(&queries(&["a", "broken", "c"]), &mut UpstreamState::new())
        .await;

    let ids: Vec<_> = report.streams.iter().map(|s| s.video_id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "c1"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].query, "broken");
    assert_eq!(report.errors[0].code, "upstream_error");
    assert!(!report.errors[0].is_timeout);
    assert!(!report.all_failed());
}

#[tokio::test]
async fn test_slow_query_times_out() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .reply("slow", Reply::Hang)
            .page("fast", vec![live_item("f1", "빠른 방송", "채널", "1명")]),
    );
    let config = DiscoveryConfig {
        timeout_ms: 300,
        ..DiscoveryConfig::default()
    };
    let discovery = engine(fetcher, config);

    let report = discovery
        .discover(&queries(&["slow", "fast"]), &mut UpstreamState::new())
        .await;

    assert_eq!(report.streams.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].query, "slow");
    assert_eq!(report.errors[0].code, "timeout");
    assert!(report.errors[0].is_timeout);
}

#[tokio::test]
async fn test_extraction_failure_and_vods() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .reply("empty", Reply::Page(page_without_data()))
            .page("vods", vec![vod_item("v1", "게임 다시보기")]),
    );
    let discovery = engine(fetcher, fast_config());

    let report = discovery
        .discover(&queries(&["empty", "vods"]), &mut UpstreamState::new())
        .await;

    assert!(report.streams.is_empty());
    assert_eq!(report.raw_items, 0);
    // A page with no live items is not a failure.
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "extraction_failed");
}

#[tokio::test]
async fn test_news_denylist_removes_matching_stream() {
    let fetcher = Arc::new(MockFetcher::new().page(
        "q",
        vec![
            live_item("news1", "게임 업계 속보 LIVE", "YTN", "900명"),
            live_item("game1", "롤 랭크 게임", "게이머", "30명"),
        ],
    ));
    let discovery = engine(fetcher, fast_config());

    let report = discovery.discover(&queries(&["q"]), &mut UpstreamState::new()).await;

    assert_eq!(report.denylisted, 1);
    assert_eq!(report.streams.len(), 1);
    assert_eq!(report.streams[0].video_id, "game1");
    assert_eq!(report.streams[0].primary_category_id.as_deref(), Some("game"));
}

#[tokio::test]
async fn test_uncategorized_stream_is_kept() {
    let fetcher = Arc::new(
        MockFetcher::new().page("q", vec![live_item("x1", "Morning vibes", "someone", "7")]),
    );
    let discovery = engine(fetcher, fast_config());

    let streams = discovery.discover_live_streams(&queries(&["q"])).await;

    assert_eq!(streams.len(), 1);
    assert!(streams[0].detected_categories.is_empty());
    assert_eq!(streams[0].primary_category_id, None);
}

#[tokio::test]
async fn test_blocked_run_arms_cooldown() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .reply("a", Reply::Fail(|| ScrapeError::Blocked(320)))
            .reply("b", Reply::Fail(|| ScrapeError::UpstreamStatus(429))),
    );
    let mut config = fast_config();
    config.block_cooldown_secs = 120;
    let discovery = engine(fetcher.clone(), config);
    let mut state = UpstreamState::new();
    let qs = queries(&["a", "b"]);

    let first = discovery.discover(&qs, &mut state).await;
    assert!(!first.skipped);
    assert!(first.all_failed());
    assert!(state.is_cooling_down(Utc::now()));
    assert_eq!(state.consecutive_blocked_runs, 1);
    assert_eq!(fetcher.calls(), 2);

    let second = discovery.discover(&qs, &mut state).await;
    assert!(second.skipped);
    assert!(second.streams.is_empty());
    assert!(second.errors.is_empty());
    assert_eq!(second.parse_timing, ParseTiming::default());
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_mixed_failures_do_not_arm_cooldown() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .reply("a", Reply::Fail(|| ScrapeError::Blocked(320)))
            .reply("b", Reply::Fail(|| ScrapeError::UpstreamStatus(503))),
    );
    let discovery = engine(fetcher, fast_config());
    let mut state = UpstreamState::new();

    discovery.discover(&queries(&["a", "b"]), &mut state).await;

    assert!(!state.is_cooling_down(Utc::now()));
    assert_eq!(state.consecutive_blocked_runs, 0);
}

#[tokio::test]
async fn test_success_clears_upstream_state() {
    let fetcher = Arc::new(
        MockFetcher::new().page("q", vec![live_item("ok1", "소통 방송", "BJ 하늘", "1명")]),
    );
    let discovery = engine(fetcher, fast_config());
    let mut state = UpstreamState::new();
    // An expired cooldown from an earlier blocked run.
    state.record_block(Utc::now() - ChronoDuration::seconds(600), 60);
    assert_eq!(state.consecutive_blocked_runs, 1);

    let report = discovery.discover(&queries(&["q"]), &mut state).await;

    assert_eq!(report.streams.len(), 1);
    assert_eq!(state, UpstreamState::default());
}

#[tokio::test]
async fn test_run_builds_queries_and_ranks() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .page(
                "seed",
                vec![
                    live_item("A", "Late show BJ", "streamer", "500명 시청 중"),
                    live_item("B", "오늘의 방송", "하루", "1만명 시청 중"),
                ],
            )
            .page("term", vec![live_item("C", "BJ 하늘 방송", "하늘", "1명 시청 중")]),
    );
    let rules = vec![
        CategoryRule::new("bj", "BJ", vec![r"\bBJ\b".into()], 10)
            .with_search_terms(vec!["term".into(), "seed".into()]),
    ];
    let config = DiscoveryConfig {
        seed_queries: vec!["seed".into()],
        ..fast_config()
    };
    let discovery = LiveDiscovery::new(fetcher, rules, config);
    assert_eq!(discovery.queries(), vec!["seed", "term"]);

    let report = discovery.run(&mut UpstreamState::new()).await;

    let ids: Vec<_> = report.streams.iter().map(|s| s.video_id.as_str()).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
    assert_eq!(report.queries, vec!["seed", "term"]);

    let records = report.records();
    assert_eq!(records[0].id, "C");
    assert_eq!(records[0].name, "하늘");
    assert_eq!(records[0].stream_url, "https://www.youtube.com/watch?v=C");
    assert_eq!(records[2].viewer_count, Some(10_000));
}

#[tokio::test]
async fn test_no_queries_yields_empty_report() {
    let fetcher = Arc::new(MockFetcher::new());
    let discovery = engine(fetcher.clone(), fast_config());
    let mut state = UpstreamState::new();

    let report = discovery.discover(&[], &mut state).await;

    assert!(report.streams.is_empty());
    assert!(!report.all_failed());
    assert_eq!(fetcher.calls(), 0);
    assert_eq!(state, UpstreamState::default());
}
