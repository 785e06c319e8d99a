use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "livescout")]
#[command(about = "livescout - find and classify live YouTube broadcasts")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  livescout discover                        Run the configured seed queries
  livescout discover -q \"먹방 라이브\"         Search one extra query
  livescout classify \"BJ 소통 방송\"          Show which categories a title hits
  livescout rules list                      Show the effective category rules

\x1b[1;36mConfiguration:\x1b[0m
  livescout rules path                      Where config and rules are read from
  livescout --config ./config.yaml discover Use a specific settings file")]
#[command(long_about = "
\x1b[1mlivescout\x1b[0m - live stream discovery

Scrapes YouTube's live-filtered search results (no API quota), keeps the items
that are broadcasting right now, drops news channels, classifies the rest
against category rules and ranks them for a Korean BJ ranking board.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Discovery settings file (default: ~/.config/livescout/config.yaml)
    #[arg(long, global = true, env = "LIVESCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Category rules file (default: ~/.config/livescout/categories.yaml)
    #[arg(long, global = true, env = "LIVESCOUT_RULES")]
    pub rules: Option<PathBuf>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover live streams
    ///
    /// Issues the configured queries in parallel, merges and ranks the results.
    #[command(alias = "d")]
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  livescout discover                        Seed queries + category search terms
  livescout discover -q \"노래 방송\" --no-seeds Only the given query
  livescout discover -l 20 --output json    Top 20 as JSON records")]
    Discover {
        /// Extra search query (repeatable)
        #[arg(short, long = "query")]
        queries: Vec<String>,

        /// Skip the configured seed queries and category search terms
        #[arg(long)]
        no_seeds: bool,

        /// Per-query timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Show at most this many streams
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Classify a piece of text against the category rules
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  livescout classify \"롤 랭크 게임 방송\"
  livescout classify \"YTN 뉴스 속보\"          Shows the denylist veto")]
    Classify {
        /// Title and channel text to classify
        text: String,
    },

    /// Inspect category rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Run the extractor and parser on a saved search page
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  livescout extract ./results.html")]
    Extract {
        /// Path to an HTML file
        file: PathBuf,
    },
}

#[derive(Subcommand, Clone)]
pub enum RulesAction {
    /// List effective rules (built-in plus user overrides)
    #[command(alias = "ls")]
    List,
    /// Show one rule
    Show {
        /// Rule id
        id: String,
    },
    /// Print config and rules file locations
    Path,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_discover() {
        let cli = Cli::parse_from([
            "livescout", "--output", "json", "discover", "-q", "a", "-q", "b", "--no-seeds", "-l", "5",
        ]);
        match cli.command {
            Commands::Discover {
                queries,
                no_seeds,
                limit,
                timeout_ms,
            } => {
                assert_eq!(queries, vec!["a", "b"]);
                assert!(no_seeds);
                assert_eq!(limit, Some(5));
                assert_eq!(timeout_ms, None);
            }
            _ => panic!("expected discover"),
        }
        assert!(matches!(cli.output, OutputFormat::Json));
    }
}
