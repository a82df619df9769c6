//! Language preference handling.
//!
//! Turns an optional comma-separated hint (`?lang=de,en`) plus the configured
//! defaults into an ordered list of language candidates.

use std::fmt;

/// Built-in default language list, used when none is configured.
pub const DEFAULT_LANGUAGES: [&str; 6] = ["en", "en-US", "en-GB", "es", "fr", "de"];

/// Hint tokens that request "no language constraint".
const ANY_TOKENS: [&str; 2] = ["*", "any"];

/// Longest accepted language tag.
const MAX_LANGUAGE_TAG_LEN: usize = 16;

/// One entry of the preference list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LanguageCandidate {
    /// A concrete language tag such as `en` or `pt-BR`
    Tag(String),
    /// No language constraint: any language is acceptable
    Any,
}

impl LanguageCandidate {
    /// The concrete tag, or `None` for [`LanguageCandidate::Any`].
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Tag(tag) => Some(tag),
            Self::Any => None,
        }
    }

    /// Case-insensitive match against an upstream language code.
    pub fn matches(&self, language_code: &str) -> bool {
        match self {
            Self::Tag(tag) => tag.eq_ignore_ascii_case(language_code),
            Self::Any => true,
        }
    }
}

impl fmt::Display for LanguageCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Any => f.write_str("*"),
        }
    }
}

/// Ordered, de-duplicated, never-empty list of language candidates.
///
/// Order is retrieval priority. [`LanguageCandidate::Any`], when present, is
/// always the final element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCandidates(Vec<LanguageCandidate>);

impl LanguageCandidates {
    pub fn iter(&self) -> std::slice::Iter<'_, LanguageCandidate> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no candidates to try.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LanguageCandidate> {
        self.0.get(index)
    }

    pub fn as_slice(&self) -> &[LanguageCandidate] {
        &self.0
    }

    /// Whether the caller asked for "no language constraint".
    pub fn is_unconstrained(&self) -> bool {
        self.0.iter().any(|c| matches!(c, LanguageCandidate::Any))
    }

    /// Whether any candidate accepts the given language code.
    pub fn accepts(&self, language_code: &str) -> bool {
        self.0.iter().any(|c| c.matches(language_code))
    }

    /// Display labels, in order (`*` for the unconstrained marker).
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a LanguageCandidates {
    type Item = &'a LanguageCandidate;
    type IntoIter = std::slice::Iter<'a, LanguageCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Builds [`LanguageCandidates`] from a user hint and a default list.
///
/// The default list is process-wide configuration and immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreferenceBuilder {
    defaults: Vec<String>,
}

impl Default for LanguagePreferenceBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES)
    }
}

impl LanguagePreferenceBuilder {
    /// Create a builder with the given defaults.
    ///
    /// Invalid and duplicate entries are dropped; an empty result falls back to
    /// [`DEFAULT_LANGUAGES`] so built lists are never empty.
    pub fn new<I, S>(defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sanitized: Vec<String> = Vec::new();
        for lang in defaults {
            if let Some(tag) = sanitize_tag(lang.as_ref()) {
                push_unique(&mut sanitized, tag);
            }
        }

        if sanitized.is_empty() {
            sanitized = DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect();
        }

        Self { defaults: sanitized }
    }

    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Build the ordered candidate list.
    ///
    /// Hinted languages come first in the given order, then the defaults not
    /// already present. A `*` or `any` token in the hint appends the
    /// unconstrained marker as the final candidate.
    pub fn build(&self, hint: Option<&str>) -> LanguageCandidates {
        self.build_with_warnings(hint).0
    }

    /// Same as [`build`](Self::build), also returning non-fatal warnings for
    /// hint entries that were ignored.
    pub fn build_with_warnings(&self, hint: Option<&str>) -> (LanguageCandidates, Vec<String>) {
        let mut tags: Vec<String> = Vec::new();
        let mut warnings = Vec::new();
        let mut unconstrained = false;

        for token in hint.unwrap_or_default().split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if ANY_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
                unconstrained = true;
                continue;
            }
            match sanitize_tag(token) {
                Some(tag) => push_unique(&mut tags, tag),
                None => warnings.push(format!(
                    "Ignored language '{}' (only ASCII alphanumeric, '-' and '_' allowed, max {} characters)",
                    token, MAX_LANGUAGE_TAG_LEN
                )),
            }
        }

        for lang in &self.defaults {
            push_unique(&mut tags, lang.clone());
        }

        let mut candidates: Vec<LanguageCandidate> =
            tags.into_iter().map(LanguageCandidate::Tag).collect();
        if unconstrained {
            candidates.push(LanguageCandidate::Any);
        }

        (LanguageCandidates(candidates), warnings)
    }
}

/// Split a comma-separated language list (config values, env vars).
pub fn split_language_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Trim and validate a language tag: ASCII alphanumerics, `-` and `_`,
/// at most 16 characters. Case is preserved.
fn sanitize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_LANGUAGE_TAG_LEN {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Case-insensitive de-duplication; the first spelling wins.
fn push_unique(list: &mut Vec<String>, tag: String) {
    if !list.iter().any(|existing| existing.eq_ignore_ascii_case(&tag)) {
        list.push(tag);
    }
}
