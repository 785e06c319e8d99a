use crate::cli::{Cli, OutputFormat};
use crate::commands::{load_config, load_rules, CommandError, Result};
use crate::output::{format_output, DiscoverySummary, OutputData};
use indicatif::{ProgressBar, ProgressStyle};
use livescout_core::{DiscoveryConfig, LiveDiscovery, UpstreamState};
use tracing::debug;

/// Queries for this invocation: configured ones unless `--no-seeds`, then `extra`.
fn plan_queries(
    discovery: &LiveDiscovery,
    extra: &[String],
    no_seeds: bool,
) -> Result<Vec<String>> {
    let mut queries = if no_seeds {
        Vec::new()
    } else {
        discovery.queries()
    };
    for q in extra.iter().map(|q| q.trim()).filter(|q| !q.is_empty()) {
        if !queries.iter().any(|existing| existing == q) {
            queries.push(q.to_string());
        }
    }
    if queries.is_empty() {
        return Err(CommandError::InvalidInput(
            "No queries to run. Pass --query or drop --no-seeds.".to_string(),
        ));
    }
    Ok(queries)
}

pub async fn run(
    cli: &Cli,
    extra: &[String],
    no_seeds: bool,
    timeout_ms: Option<u64>,
    limit: Option<usize>,
) -> Result<()> {
    let mut config: DiscoveryConfig = load_config(cli)?;
    if let Some(ms) = timeout_ms {
        config.timeout_ms = ms;
    }
    let rules = load_rules(cli)?;
    let default_category = config.default_category.clone();
    let discovery = LiveDiscovery::youtube(rules, config)?;
    let queries = plan_queries(&discovery, extra, no_seeds)?;
    debug!(queries = ?queries, "planned discovery queries");

    let spinner = matches!(cli.output, OutputFormat::Pretty).then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Searching {} queries for live streams...", queries.len()));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    });

    // One-shot process: cooldown state only spans this invocation.
    let mut state = UpstreamState::new();
    let mut report = discovery.discover(&queries, &mut state).await;
    report.streams = livescout_core::rank(std::mem::take(&mut report.streams), &default_category);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let summary = DiscoverySummary::from_report(&report, limit);
    format_output(&OutputData::Discovery(summary), &cli.output)
}
