//! Transcript library seam.
//!
//! The library is an optional capability: builds without the `library`
//! feature get [`UnavailableLibrary`], which the orchestrator treats the same
//! as a library that found nothing.

use std::sync::Arc;

use async_trait::async_trait;
use tscript_models::{LanguageCandidate, VideoId};

use crate::error::{FetchError, FetchResult};
use crate::parser::LibraryCue;

/// A pre-built transcript fetching dependency.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptLibrary: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Whether the library can be called at all.
    fn is_available(&self) -> bool;

    /// Fetch cues for one language candidate. [`LanguageCandidate::Any`]
    /// lets the library pick whatever language it finds.
    async fn fetch(
        &self,
        video_id: &VideoId,
        language: &LanguageCandidate,
    ) -> FetchResult<Vec<LibraryCue>>;
}

/// Stand-in used when no library is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLibrary;

#[async_trait]
impl TranscriptLibrary for UnavailableLibrary {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn fetch(
        &self,
        _video_id: &VideoId,
        _language: &LanguageCandidate,
    ) -> FetchResult<Vec<LibraryCue>> {
        Err(FetchError::LibraryUnavailable)
    }
}

/// Library backed by the `ytranscript` crate.
#[cfg(feature = "library")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YtranscriptLibrary;

#[cfg(feature = "library")]
#[async_trait]
impl TranscriptLibrary for YtranscriptLibrary {
    fn name(&self) -> &'static str {
        "ytranscript"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        video_id: &VideoId,
        language: &LanguageCandidate,
    ) -> FetchResult<Vec<LibraryCue>> {
        use ytranscript::{TranscriptConfig, YoutubeTranscript};

        let config = TranscriptConfig {
            lang: language.tag().map(str::to_string),
        };

        let entries = YoutubeTranscript::fetch_transcript(video_id.as_str(), Some(config))
            .await
            .map_err(|e| FetchError::library(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|entry| LibraryCue {
                offset: f64::from(entry.offset),
                duration: f64::from(entry.duration),
                text: entry.text,
            })
            .collect())
    }
}

/// The library compiled into this build.
pub fn default_library() -> Arc<dyn TranscriptLibrary> {
    #[cfg(feature = "library")]
    {
        Arc::new(YtranscriptLibrary)
    }
    #[cfg(not(feature = "library"))]
    {
        Arc::new(UnavailableLibrary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_library() {
        let library = UnavailableLibrary;
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();

        assert!(!library.is_available());
        let err = library.fetch(&id, &LanguageCandidate::Any).await.unwrap_err();
        assert!(matches!(err, FetchError::LibraryUnavailable));
    }

    #[test]
    fn test_default_library_matches_features() {
        let library = default_library();
        assert_eq!(library.is_available(), cfg!(feature = "library"));
    }
}
