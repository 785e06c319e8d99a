pub mod classify;
pub mod discover;
pub mod extract;
pub mod rules;

use crate::cli::Cli;
use livescout_core::{CategoryRule, DiscoveryConfig, RuleStore};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Category rule '{0}' not found")]
    RuleNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Core library error: {0}")]
    Core(#[from] livescout_core::ScrapeError),

    #[error("Rule store error: {0}")]
    Rules(#[from] livescout_core::RuleStoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Discovery settings. An explicit `--config` file must exist and parse;
/// the default location falls back to built-in defaults.
pub fn load_config(cli: &Cli) -> Result<DiscoveryConfig> {
    match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(CommandError::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Ok(DiscoveryConfig::load(path)?)
        }
        None => Ok(DiscoveryConfig::load_default()),
    }
}

pub fn rule_store(cli: &Cli) -> RuleStore {
    match &cli.rules {
        Some(path) => RuleStore::new(path.clone()),
        None => RuleStore::new_default(),
    }
}

/// Effective rules. Same strictness split as [`load_config`].
pub fn load_rules(cli: &Cli) -> Result<Vec<CategoryRule>> {
    let store = rule_store(cli);
    if cli.rules.is_some() {
        Ok(store.try_list_all()?)
    } else {
        Ok(store.list_all())
    }
}
