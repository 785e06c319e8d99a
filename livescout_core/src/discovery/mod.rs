//! Live stream discovery across parallel search queries.
//!
//! This module provides:
//! - `LiveDiscovery`: engine that fans queries out, merges and classifies
//! - `CanonicalLiveStream` / `LiveStreamRecord`: per-run and output shapes
//! - `DiscoveryReport`: streams plus per-query errors and counters
//! - `UpstreamState`: caller-owned cooldown after the upstream blocks us
//!
//! # Example
//!
//! ```ignore
//! use livescout_core::discovery::{LiveDiscovery, UpstreamState};
//! use livescout_core::{builtin_rules, DiscoveryConfig};
//!
//! let engine = LiveDiscovery::youtube(builtin_rules().to_vec(), DiscoveryConfig::default())?;
//! let mut state = UpstreamState::new();
//! let report = engine.run(&mut state).await;
//! let records = report.records();
//! ```

mod context;
mod engine;
mod types;

pub use context::UpstreamState;
pub use engine::LiveDiscovery;
pub use types::{
    CanonicalLiveStream, DiscoveryReport, LiveStreamRecord, QueryError, PLATFORM_YOUTUBE,
};
