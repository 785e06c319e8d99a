//! Rule-based category classification.
//!
//! A rule matches when at least one include pattern matches and no exclude
//! pattern does. Several rules can match one stream; the highest-scoring one is
//! its primary category.
//!
//! # Example
//!
//! ```rust,ignore
//! use livescout_core::category::{CategoryMatcher, CategoryRule};
//!
//! let rules = vec![CategoryRule::new("music", "Music", vec!["노래".into()], 10)];
//! let matcher = CategoryMatcher::new(&rules);
//! let detected = matcher.match_text("노래 방송 LIVE");
//! assert_eq!(detected[0].category_id, "music");
//! ```

mod builtin;
pub mod store;

pub use builtin::{builtin_rules, DEFAULT_CATEGORY_ID};
pub use store::{RuleStore, RuleStoreError};

use crate::error::ScrapeError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An administrator-defined classification rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Stable identifier (e.g., "music"). In the rules file the map key wins.
    #[serde(default)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Regex patterns; any one matching makes the rule a candidate
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns; any one matching vetoes the rule
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Score multiplier in tenths (10 = 1.0x)
    #[serde(default = "default_priority")]
    pub priority: u32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Extra search queries issued when this rule is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_terms: Vec<String>,
}

fn default_priority() -> u32 {
    10
}

fn default_enabled() -> bool {
    true
}

impl CategoryRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        include: Vec<String>,
        priority: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            include,
            exclude: Vec::new(),
            priority,
            enabled: true,
            search_terms: Vec::new(),
        }
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_search_terms(mut self, terms: Vec<String>) -> Self {
        self.search_terms = terms;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A category a stream was matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedCategory {
    pub category_id: String,
    pub score: f64,
}

/// Confidence for a rule that passed include/exclude.
///
/// `0.5 + ratio * 0.5`, capped at 1.0, then scaled by `priority / 10`. The
/// scaling is applied after the cap, so priorities above 10 give scores above
/// 1.0.
pub fn rule_score(matched: usize, total: usize, priority: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let base = (0.5 + (matched as f64 / total as f64) * 0.5).min(1.0);
    base * (priority as f64 / 10.0)
}

struct CompiledRule {
    id: String,
    priority: u32,
    include: Vec<Option<Regex>>,
    exclude: Vec<Option<Regex>>,
}

impl CompiledRule {
    fn evaluate(&self, text: &str) -> Option<DetectedCategory> {
        let matched = self
            .include
            .iter()
            .flatten()
            .filter(|re| re.is_match(text))
            .count();
        if matched == 0 {
            return None;
        }
        if self.exclude.iter().flatten().any(|re| re.is_match(text)) {
            return None;
        }
        Some(DetectedCategory {
            category_id: self.id.clone(),
            score: rule_score(matched, self.include.len(), self.priority),
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Enabled rules with their patterns compiled once.
pub struct CategoryMatcher {
    rules: Vec<CompiledRule>,
}

impl CategoryMatcher {
    /// Compile `rules`, skipping disabled ones.
    ///
    /// An invalid pattern is logged and never matches; it still counts toward
    /// the rule's include total.
    pub fn new(rules: &[CategoryRule]) -> Self {
        let lenient = |rule: &CategoryRule, pattern: &String| match compile(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(
                    target: "livescout.category",
                    rule = %rule.id,
                    pattern = %pattern,
                    error = %e,
                    "invalid category pattern ignored"
                );
                None
            }
        };

        let rules = rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| CompiledRule {
                id: rule.id.clone(),
                priority: rule.priority,
                include: rule.include.iter().map(|p| lenient(rule, p)).collect(),
                exclude: rule.exclude.iter().map(|p| lenient(rule, p)).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Compile `rules`, failing on the first invalid pattern.
    pub fn try_new(rules: &[CategoryRule]) -> Result<Self, ScrapeError> {
        let strict = |rule: &CategoryRule, pattern: &String| {
            compile(pattern)
                .map(Some)
                .map_err(|source| ScrapeError::InvalidPattern {
                    rule: rule.id.clone(),
                    pattern: pattern.clone(),
                    source,
                })
        };

        let mut compiled = Vec::new();
        for rule in rules.iter().filter(|rule| rule.enabled) {
            compiled.push(CompiledRule {
                id: rule.id.clone(),
                priority: rule.priority,
                include: rule
                    .include
                    .iter()
                    .map(|p| strict(rule, p))
                    .collect::<Result<_, _>>()?,
                exclude: rule
                    .exclude
                    .iter()
                    .map(|p| strict(rule, p))
                    .collect::<Result<_, _>>()?,
            });
        }
        Ok(Self { rules: compiled })
    }

    /// Score `text` against every enabled rule, best first.
    pub fn match_text(&self, text: &str) -> Vec<DetectedCategory> {
        let mut detected: Vec<DetectedCategory> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(text))
            .collect();
        detected.sort_by(|a, b| b.score.total_cmp(&a.score));
        detected
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One-shot classification; compiles `rules` on every call.
pub fn match_categories(text: &str, rules: &[CategoryRule]) -> Vec<DetectedCategory> {
    CategoryMatcher::new(rules).match_text(text)
}

/// Id of the best match, if any. Expects `detected` sorted best first.
pub fn primary_category(detected: &[DetectedCategory]) -> Option<String> {
    detected.first().map(|d| d.category_id.clone())
}
