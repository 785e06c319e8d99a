//! Pretty formatter for terminal output.
//!
//! Bold titles, dimmed metadata, one table per list.

use super::{DiscoverySummary, OutputData};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use livescout_core::{CategoryRule, DetectedCategory, RawDiscoveredStream};
use owo_colors::OwoColorize;

/// Terminal width for formatting (default fallback)
const DEFAULT_WIDTH: usize = 80;

/// Widest a title column gets before truncation
const MAX_TITLE_WIDTH: usize = 60;

pub fn format_pretty_output(data: &OutputData) {
    match data {
        OutputData::Discovery(summary) => format_discovery(summary),
        OutputData::Classification {
            text,
            denied_by,
            detected,
            primary,
        } => {
            println!("{} {}", "Text:".dimmed(), text.cyan().bold());
            println!();
            if let Some(pattern) = denied_by {
                println!(
                    "{} news denylist matched {}",
                    "Dropped:".red().bold(),
                    pattern.yellow()
                );
                println!();
            }
            if detected.is_empty() {
                println!("{}", "No category matched".dimmed());
            } else {
                println!("{}", categories_table(detected));
            }
            println!();
            println!(
                "{} {}",
                "Primary:".dimmed(),
                primary.as_deref().unwrap_or("none").green().bold()
            );
        }
        OutputData::RuleList(rules) => {
            println!("{}", "Category Rules".cyan().bold());
            println!();
            println!("{}", rules_table(rules));
        }
        OutputData::Rule(rule) => format_rule(rule),
        OutputData::Paths { config, rules } => {
            println!("{} {}", "Config:".dimmed(), config);
            println!("{} {}", "Rules: ".dimmed(), rules);
        }
        OutputData::Extraction {
            file,
            strategy,
            items,
        } => {
            println!("{} {}", "File:".dimmed(), file.cyan().bold());
            match strategy {
                Some(name) => println!("{} {}", "Strategy:".dimmed(), name.green()),
                None => println!("{} {}", "Strategy:".dimmed(), "none matched".red()),
            }
            println!();
            if items.is_empty() {
                println!("{}", "No live items".dimmed());
            } else {
                println!("{}", items_table(items));
            }
        }
    }
}

fn format_discovery(summary: &DiscoverySummary) {
    if summary.skipped {
        println!(
            "{}",
            "Upstream is cooling down after a blocked run; nothing fetched.".yellow()
        );
        return;
    }

    println!(
        "{} {} {}",
        "Live streams".cyan().bold(),
        summary.streams.len().to_string().green().bold(),
        format!("({} queries, {}ms)", summary.queries.len(), summary.duration_ms).dimmed()
    );
    println!();

    if summary.streams.is_empty() {
        println!("{}", "No live streams found".dimmed());
    } else {
        let width = terminal_width();
        let title_width = width.saturating_sub(50).clamp(20, MAX_TITLE_WIDTH);

        let mut table = new_table();
        table.set_header(header(&["#", "Category", "Viewers", "Channel", "Title"]));
        for (i, s) in summary.streams.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(s.primary_category_id.as_deref().unwrap_or("-")),
                Cell::new(
                    s.viewer_count
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::new(truncate_str(&s.name, 24)),
                Cell::new(truncate_str(&s.title, title_width)),
            ]);
        }
        println!("{}", table);
    }

    println!();
    println!(
        "{}",
        format!(
            "{} raw items, {} duplicates, {} denylisted",
            summary.raw_items, summary.duplicates, summary.denylisted
        )
        .dimmed()
    );

    if !summary.errors.is_empty() {
        println!();
        println!("{}", "Failed queries".yellow().bold());
        for e in &summary.errors {
            println!("  {} {} {}", e.query.yellow(), e.code.red(), e.error.dimmed());
        }
    }
}

fn format_rule(rule: &CategoryRule) {
    let state = if rule.enabled {
        "enabled".green().to_string()
    } else {
        "disabled".red().to_string()
    };
    println!("{} {} {}", rule.id.cyan().bold(), rule.name, state);
    if let Some(description) = &rule.description {
        println!("  {}", description.dimmed());
    }
    println!();
    println!("  {} {}", "priority".dimmed(), rule.priority);
    println!("  {} {}", "include ".dimmed(), rule.include.join("  "));
    if !rule.exclude.is_empty() {
        println!("  {} {}", "exclude ".dimmed(), rule.exclude.join("  "));
    }
    if !rule.search_terms.is_empty() {
        println!("  {} {}", "queries ".dimmed(), rule.search_terms.join(", "));
    }
}

fn categories_table(detected: &[DetectedCategory]) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Category", "Score"]));
    for d in detected {
        table.add_row(vec![
            Cell::new(&d.category_id),
            Cell::new(format!("{:.3}", d.score)),
        ]);
    }
    table
}

fn rules_table(rules: &[CategoryRule]) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Id", "Name", "Priority", "Enabled", "Include"]));
    for r in rules {
        table.add_row(vec![
            Cell::new(&r.id),
            Cell::new(&r.name),
            Cell::new(r.priority),
            Cell::new(if r.enabled { "yes" } else { "no" }),
            Cell::new(truncate_str(&r.include.join(", "), 40)),
        ]);
    }
    table
}

fn items_table(items: &[RawDiscoveredStream]) -> Table {
    let mut table = new_table();
    table.set_header(header(&["Video", "Viewers", "Channel", "Title"]));
    for item in items {
        table.add_row(vec![
            Cell::new(&item.video_id),
            Cell::new(item.viewer_count_raw.as_deref().unwrap_or("-")),
            Cell::new(truncate_str(&item.channel_title, 24)),
            Cell::new(truncate_str(&item.title, MAX_TITLE_WIDTH)),
        ]);
    }
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(columns: &[&str]) -> Vec<Cell> {
    columns
        .iter()
        .map(|col| Cell::new(col.cyan().bold().to_string()))
        .collect()
}

fn truncate_str(s: &str, max_len: usize) -> String {
    // Take first line only
    let first_line = s.lines().next().unwrap_or(s);

    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let truncated: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}
