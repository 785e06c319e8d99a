// src/error.rs

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Page is a bot check or interstitial ({0} chars)")]
    Blocked(usize),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("No initial state JSON found in page")]
    ExtractionFailed,

    #[error("Invalid pattern '{pattern}' in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScrapeError {
    pub fn code_str(&self) -> &'static str {
        match self {
            ScrapeError::HttpRequest(e) if e.is_timeout() => "timeout",
            ScrapeError::HttpRequest(_) => "upstream_error",
            ScrapeError::UpstreamStatus(429) => "rate_limited",
            ScrapeError::UpstreamStatus(_) => "upstream_error",
            ScrapeError::Blocked(_) => "blocked",
            ScrapeError::Timeout(_) => "timeout",
            ScrapeError::ExtractionFailed => "extraction_failed",
            ScrapeError::InvalidPattern { .. } => "invalid_pattern",
            ScrapeError::InvalidUrl(_) => "invalid_input",
            ScrapeError::Config(_) | ScrapeError::Yaml(_) => "config_error",
            ScrapeError::SerdeJson(_) => "parse_error",
            ScrapeError::Io(_) | ScrapeError::Other(_) => "internal_error",
        }
    }

    /// Whether the upstream refused to serve a usable page (bot check or 429).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            ScrapeError::Blocked(_) | ScrapeError::UpstreamStatus(429)
        )
    }

    pub fn is_timeout(&self) -> bool {
        self.code_str() == "timeout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_str() {
        assert_eq!(ScrapeError::Blocked(120).code_str(), "blocked");
        assert_eq!(ScrapeError::UpstreamStatus(429).code_str(), "rate_limited");
        assert_eq!(ScrapeError::UpstreamStatus(503).code_str(), "upstream_error");
        assert_eq!(
            ScrapeError::Timeout("8000ms".into()).code_str(),
            "timeout"
        );
        assert_eq!(ScrapeError::ExtractionFailed.code_str(), "extraction_failed");
    }

    #[test]
    fn test_block_detection() {
        assert!(ScrapeError::Blocked(10).is_block());
        assert!(ScrapeError::UpstreamStatus(429).is_block());
        assert!(!ScrapeError::UpstreamStatus(500).is_block());
        assert!(!ScrapeError::ExtractionFailed.is_block());
    }
}
