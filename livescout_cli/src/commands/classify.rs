use crate::cli::Cli;
use crate::commands::{load_config, load_rules, Result};
use crate::output::{format_output, OutputData};
use livescout_core::{primary_category, CategoryMatcher, NewsDenylist};

pub fn run(cli: &Cli, text: &str) -> Result<()> {
    let config = load_config(cli)?;
    let rules = load_rules(cli)?;

    // Strict here: a bad pattern should be reported, not silently ignored.
    let matcher = CategoryMatcher::try_new(&rules)?;
    let denylist = NewsDenylist::with_extra(&config.news_denylist);

    let detected = matcher.match_text(text);
    let data = OutputData::Classification {
        text: text.to_string(),
        denied_by: denylist.matched_pattern(text).map(str::to_string),
        primary: primary_category(&detected),
        detected,
    };
    format_output(&data, &cli.output)
}
