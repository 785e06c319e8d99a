//! Parse pool for result pages.
//!
//! Extraction walks the whole document and the parser walks the whole JSON
//! tree; both run on a small rayon pool so a burst of pages never stalls the
//! async runtime. Each job reports how long it queued and how long it ran.

use crate::error::ScrapeError;
use crate::extract::extract_with_strategy;
use crate::parser::{extract_live_items, RawDiscoveredStream};
use once_cell::sync::Lazy;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Jobs that wait longer than this for a worker are reported at info.
const SLOW_WAIT: Duration = Duration::from_millis(250);

static WORKERS: Lazy<usize> = Lazy::new(|| {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(4)
        .clamp(2, 8)
});

static PARSE_POOL: Lazy<Option<ThreadPool>> = Lazy::new(|| {
    rayon::ThreadPoolBuilder::new()
        .num_threads(*WORKERS)
        .thread_name(|idx| format!("livescout-parse-{idx}"))
        .build()
        .ok()
});

/// Queue and run time of parse work, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTiming {
    /// Time between submission and a worker picking the job up
    pub wait_ms: u64,
    /// Time spent in the job itself
    pub run_ms: u64,
}

impl ParseTiming {
    /// Accumulate another job's timing into this one.
    pub fn add(&mut self, other: ParseTiming) {
        self.wait_ms = self.wait_ms.saturating_add(other.wait_ms);
        self.run_ms = self.run_ms.saturating_add(other.run_ms);
    }
}

/// Live items from one result page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Extraction strategy that found the initial state
    pub strategy: &'static str,
    pub items: Vec<RawDiscoveredStream>,
    pub timing: ParseTiming,
}

/// Extract and parse a result page on the parse pool.
///
/// A page without initial state is [`ScrapeError::ExtractionFailed`]; a page
/// with state but no live items is an empty `items`.
pub async fn parse_search_page(html: String) -> Result<ParsedPage, ScrapeError> {
    let ((strategy, items), timing) = spawn_cpu(move || {
        let (strategy, data) = extract_with_strategy(&html).ok_or(ScrapeError::ExtractionFailed)?;
        Ok((strategy, extract_live_items(&data)))
    })
    .await?;
    Ok(ParsedPage {
        strategy,
        items,
        timing,
    })
}

/// Run `job` on the parse pool and await its result with its timing.
///
/// A panic inside `job` becomes [`ScrapeError::Other`].
pub async fn spawn_cpu<F, R>(job: F) -> Result<(R, ParseTiming), ScrapeError>
where
    F: FnOnce() -> Result<R, ScrapeError> + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let submitted = Instant::now();
    let task = move || {
        let started = Instant::now();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job))
            .map_err(|payload| {
                ScrapeError::Other(format!("parse task panicked: {}", panic_message(&*payload)))
            })
            .and_then(|inner| inner);
        let timing = ParseTiming {
            wait_ms: as_millis(started.duration_since(submitted)),
            run_ms: as_millis(started.elapsed()),
        };
        let _ = tx.send(result.map(|value| (value, timing)));
    };

    match PARSE_POOL.as_ref() {
        Some(pool) => pool.spawn(task),
        None => rayon::spawn(task),
    }

    let (value, timing) = rx
        .await
        .map_err(|err| ScrapeError::Other(format!("parse pool join error: {}", err)))??;

    if Duration::from_millis(timing.wait_ms) >= SLOW_WAIT {
        info!(
            target: "livescout.cpu_pool",
            wait_ms = timing.wait_ms,
            run_ms = timing.run_ms,
            workers = worker_count(),
            "parse pool saturated"
        );
    } else {
        debug!(
            target: "livescout.cpu_pool",
            wait_ms = timing.wait_ms,
            run_ms = timing.run_ms,
            "parse job done"
        );
    }
    Ok((value, timing))
}

/// Threads in the parse pool.
pub fn worker_count() -> usize {
    *WORKERS
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| (*msg).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
