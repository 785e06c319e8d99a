use clap::Parser;
use owo_colors::OwoColorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use commands::*;

fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "livescout_cli=info,livescout_core=info",
        1 => "livescout_cli=debug,livescout_core=debug",
        _ => "livescout_cli=trace,livescout_core=trace",
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(cli.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match &cli.command {
        Commands::Discover {
            queries,
            no_seeds,
            timeout_ms,
            limit,
        } => discover::run(&cli, queries, *no_seeds, *timeout_ms, *limit).await,
        Commands::Classify { text } => classify::run(&cli, text),
        Commands::Rules { action } => rules::run(&cli, action.clone()),
        Commands::Extract { file } => extract::run(&cli, file).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}
