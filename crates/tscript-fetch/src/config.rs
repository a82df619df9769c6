//! Retrieval configuration.

use std::time::Duration;

use tscript_models::{split_language_list, LanguagePreferenceBuilder, DEFAULT_LANGUAGES};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Desktop browser User-Agent; the watch page serves a stripped document to
/// unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Configuration for transcript retrieval.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Default language list appended after any hint
    pub default_languages: Vec<String>,
    /// Watch page origin
    pub base_url: String,
    pub user_agent: String,
    pub accept_language: String,
    /// Per-request timeout for watch page and caption payload fetches
    pub upstream_timeout: Duration,
    /// Per-language timeout for library attempts
    pub library_timeout: Duration,
    /// Total time across all library attempts before falling back to the
    /// watch page
    pub library_budget: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_languages: DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            upstream_timeout: Duration::from_secs(10),
            library_timeout: Duration::from_secs(10),
            library_budget: Duration::from_secs(20),
        }
    }
}

impl FetchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_languages: std::env::var("TRANSCRIPT_DEFAULT_LANGS")
                .ok()
                .map(|s| split_language_list(&s))
                .filter(|langs| !langs.is_empty())
                .unwrap_or(defaults.default_languages),
            base_url: std::env::var("YOUTUBE_BASE_URL")
                .ok()
                .map(|s| s.trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.base_url),
            user_agent: std::env::var("UPSTREAM_USER_AGENT").unwrap_or(defaults.user_agent),
            accept_language: std::env::var("UPSTREAM_ACCEPT_LANGUAGE")
                .unwrap_or(defaults.accept_language),
            upstream_timeout: Duration::from_secs(
                std::env::var("UPSTREAM_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            library_timeout: Duration::from_secs(
                std::env::var("LIBRARY_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            library_budget: Duration::from_secs(
                std::env::var("LIBRARY_BUDGET")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(20),
            ),
        }
    }

    /// Upper bound on one retrieval: the library budget plus one watch page
    /// and one caption payload fetch.
    pub fn worst_case_retrieval(&self) -> Duration {
        self.library_budget + self.upstream_timeout * 2
    }

    /// Language preference builder over the configured defaults.
    pub fn language_builder(&self) -> LanguagePreferenceBuilder {
        LanguagePreferenceBuilder::new(&self.default_languages)
    }
}
