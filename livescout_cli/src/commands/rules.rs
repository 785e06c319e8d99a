use crate::cli::{Cli, RulesAction};
use crate::commands::{load_rules, rule_store, CommandError, Result};
use crate::output::{format_output, OutputData};
use livescout_core::DiscoveryConfig;

pub fn run(cli: &Cli, action: RulesAction) -> Result<()> {
    let data = match action {
        RulesAction::List => OutputData::RuleList(load_rules(cli)?),
        RulesAction::Show { id } => {
            let rule = load_rules(cli)?
                .into_iter()
                .find(|r| r.id == id)
                .ok_or(CommandError::RuleNotFound(id))?;
            OutputData::Rule(rule)
        }
        RulesAction::Path => {
            let config = cli
                .config
                .clone()
                .unwrap_or_else(DiscoveryConfig::default_path);
            OutputData::Paths {
                config: config.display().to_string(),
                rules: rule_store(cli).path().display().to_string(),
            }
        }
    };
    format_output(&data, &cli.output)
}
