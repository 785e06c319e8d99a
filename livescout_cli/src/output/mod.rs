use crate::cli::OutputFormat;
use crate::commands::Result;
use livescout_core::{
    CategoryRule, DetectedCategory, DiscoveryReport, LiveStreamRecord, QueryError,
    RawDiscoveredStream,
};
use serde::{Deserialize, Serialize};

mod pretty;

/// Serialized view of a discovery run: output records plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySummary {
    pub streams: Vec<LiveStreamRecord>,
    pub queries: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<QueryError>,
    pub raw_items: usize,
    pub duplicates: usize,
    pub denylisted: usize,
    pub skipped: bool,
    pub duration_ms: u64,
    pub generated_at: String,
}

impl DiscoverySummary {
    pub fn from_report(report: &DiscoveryReport, limit: Option<usize>) -> Self {
        let mut streams = report.records();
        if let Some(limit) = limit {
            streams.truncate(limit);
        }
        Self {
            streams,
            queries: report.queries.clone(),
            errors: report.errors.clone(),
            raw_items: report.raw_items,
            duplicates: report.duplicates,
            denylisted: report.denylisted,
            skipped: report.skipped,
            duration_ms: report.duration_ms,
            generated_at: report.generated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OutputData {
    Discovery(DiscoverySummary),
    Classification {
        text: String,
        /// Denylist pattern that vetoes the text, if any
        denied_by: Option<String>,
        detected: Vec<DetectedCategory>,
        primary: Option<String>,
    },
    RuleList(Vec<CategoryRule>),
    Rule(CategoryRule),
    Paths {
        config: String,
        rules: String,
    },
    Extraction {
        file: String,
        strategy: Option<String>,
        items: Vec<RawDiscoveredStream>,
    },
}

pub fn format_output(data: &OutputData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(data)?);
        }
        OutputFormat::Text => {
            format_text_output(data);
        }
        OutputFormat::Pretty => {
            pretty::format_pretty_output(data);
        }
    }
    Ok(())
}

fn format_text_output(data: &OutputData) {
    match data {
        OutputData::Discovery(summary) => {
            for s in &summary.streams {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    s.id,
                    s.primary_category_id.as_deref().unwrap_or("-"),
                    s.viewer_count.map(|v| v.to_string()).unwrap_or_else(|| "-".into()),
                    s.name,
                    s.title
                );
            }
            for e in &summary.errors {
                eprintln!("error\t{}\t{}\t{}", e.query, e.code, e.error);
            }
        }
        OutputData::Classification {
            denied_by,
            detected,
            primary,
            ..
        } => {
            if let Some(pattern) = denied_by {
                println!("denied\t{}", pattern);
            }
            for d in detected {
                println!("{}\t{:.3}", d.category_id, d.score);
            }
            println!("primary\t{}", primary.as_deref().unwrap_or("-"));
        }
        OutputData::RuleList(rules) => {
            for r in rules {
                println!("{}\t{}\t{}\t{}", r.id, r.priority, r.enabled, r.name);
            }
        }
        OutputData::Rule(rule) => {
            println!("id\t{}", rule.id);
            println!("name\t{}", rule.name);
            println!("priority\t{}", rule.priority);
            println!("enabled\t{}", rule.enabled);
            println!("include\t{}", rule.include.join(" | "));
            println!("exclude\t{}", rule.exclude.join(" | "));
            println!("search_terms\t{}", rule.search_terms.join(" | "));
        }
        OutputData::Paths { config, rules } => {
            println!("config\t{}", config);
            println!("rules\t{}", rules);
        }
        OutputData::Extraction {
            strategy, items, ..
        } => {
            println!("strategy\t{}", strategy.as_deref().unwrap_or("none"));
            for item in items {
                println!(
                    "{}\t{}\t{}\t{}",
                    item.video_id,
                    item.viewer_count_raw.as_deref().unwrap_or("-"),
                    item.channel_title,
                    item.title
                );
            }
        }
    }
}
