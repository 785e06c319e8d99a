use crate::cli::Cli;
use crate::commands::Result;
use crate::output::{format_output, OutputData};
use livescout_core::cpu_pool::parse_search_page;
use livescout_core::ScrapeError;
use std::path::Path;

pub async fn run(cli: &Cli, file: &Path) -> Result<()> {
    let html = tokio::fs::read_to_string(file).await?;

    let (strategy, items) = match parse_search_page(html).await {
        Ok(page) => (Some(page.strategy.to_string()), page.items),
        Err(ScrapeError::ExtractionFailed) => (None, Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let data = OutputData::Extraction {
        file: file.display().to_string(),
        strategy,
        items,
    };
    format_output(&data, &cli.output)
}
