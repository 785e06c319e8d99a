//! News-channel denylist.
//!
//! Keyword rules false-positive on news coverage whose headlines happen to
//! contain a category keyword. Streams matching the denylist are dropped before
//! classification, whatever the rules would have said.

use crate::error::ScrapeError;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Built-in news broadcaster names and keywords. Broadcaster names allow a
/// trailing channel number ("KBS2", "YTN24").
pub const DEFAULT_NEWS_PATTERNS: &[&str] = &[
    "뉴스",
    r"\bnews\b",
    r"\bYTN\d*\b",
    r"\bKBS\d*\b",
    r"\bMBC\d*\b",
    r"\bSBS\d*\b",
    r"\bJTBC\d*\b",
    r"\bMBN\d*\b",
    "연합뉴스",
    "채널\\s*A",
    "TV\\s*조선",
    "속보",
    "브리핑",
];

pub struct NewsDenylist {
    patterns: Vec<Regex>,
}

impl NewsDenylist {
    /// The built-in patterns plus `extra`; invalid extras are logged and skipped.
    pub fn with_extra(extra: &[String]) -> Self {
        let patterns = DEFAULT_NEWS_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .filter_map(|p| match build(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(
                        target: "livescout.denylist",
                        pattern = %p,
                        error = %e,
                        "invalid denylist pattern ignored"
                    );
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Exactly `patterns`, without the built-ins.
    pub fn from_patterns(patterns: &[String]) -> Result<Self, ScrapeError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                build(p).map_err(|source| ScrapeError::InvalidPattern {
                    rule: "news_denylist".to_string(),
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// First pattern that matches `text`, if any.
    pub fn matched_pattern(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|re| re.is_match(text))
            .map(Regex::as_str)
    }

    pub fn is_denied(&self, text: &str) -> bool {
        self.matched_pattern(text).is_some()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for NewsDenylist {
    fn default() -> Self {
        Self::with_extra(&[])
    }
}

fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns_compile() {
        assert_eq!(NewsDenylist::default().len(), DEFAULT_NEWS_PATTERNS.len());
    }

    #[test]
    fn test_news_titles_denied() {
        let denylist = NewsDenylist::default();
        assert!(denylist.is_denied("[LIVE] YTN 24 뉴스 특보"));
        assert!(denylist.is_denied("SBS News live"));
        assert!(denylist.is_denied("오늘의 속보 게임 업데이트"));
        assert!(!denylist.is_denied("BJ 소통 방송 게임 합방"));
        // Word boundaries keep substrings from matching.
        assert!(!denylist.is_denied("newsletter 읽어주는 방송"));
    }

    #[test]
    fn test_numbered_broadcaster_channels_denied() {
        let denylist = NewsDenylist::default();
        assert_eq!(denylist.matched_pattern("KBS2 라이브"), Some(r"\bKBS\d*\b"));
        assert!(denylist.is_denied("YTN24"));
        assert!(denylist.is_denied("SBS Biz 라이브"));
        assert!(denylist.is_denied("mbc1 편성표"));
        assert!(!denylist.is_denied("KBSX 팬 방송"));
    }

    #[test]
    fn test_extra_patterns() {
        let denylist = NewsDenylist::with_extra(&["경제\\s*TV".to_string(), "(bad".to_string()]);
        assert_eq!(denylist.len(), DEFAULT_NEWS_PATTERNS.len() + 1);
        assert_eq!(denylist.matched_pattern("한국경제 TV 라이브"), Some("경제\\s*TV"));
    }

    #[test]
    fn test_from_patterns_strict() {
        assert!(NewsDenylist::from_patterns(&["(bad".to_string()]).is_err());
        let only = NewsDenylist::from_patterns(&["only".to_string()]).unwrap();
        assert!(only.is_denied("ONLY this"));
        assert!(!only.is_denied("뉴스"));
    }
}
