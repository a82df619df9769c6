//! Retrieval orchestration.
//!
//! Library attempts run across the language candidates in order; only when
//! every candidate fails, or the library budget runs out, does the watch page
//! strategy run. The first success ends retrieval.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use tscript_models::{
    Diagnostics, LanguageCandidates, LibraryStatus, RetrievalOutcome, RetrievalReport, VideoId,
};

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::library::{default_library, TranscriptLibrary};
use crate::strategy::{PrimaryStrategy, SecondaryStrategy};
use crate::upstream::{HttpUpstream, Upstream};

/// Metric names.
pub mod names {
    pub const TRANSCRIPT_OUTCOMES_TOTAL: &str = "tscript_transcript_outcomes_total";
    pub const LIBRARY_ATTEMPTS_TOTAL: &str = "tscript_library_attempts_total";
}

/// Orchestration states.
#[derive(Debug)]
enum Step {
    /// Library attempt for the candidate at this index
    TryPrimary(usize),
    TryWatchPage,
    Done(RetrievalOutcome),
}

/// Sequences the primary and secondary strategies.
pub struct RetrievalOrchestrator {
    primary: PrimaryStrategy,
    secondary: SecondaryStrategy,
    library_budget: Duration,
}

impl RetrievalOrchestrator {
    pub fn new(
        library: Arc<dyn TranscriptLibrary>,
        upstream: Arc<dyn Upstream>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            primary: PrimaryStrategy::new(library, config.library_timeout),
            secondary: SecondaryStrategy::new(upstream),
            library_budget: config.library_budget,
        }
    }

    /// Orchestrator over the compiled-in library and the HTTP upstream.
    pub fn from_config(config: &FetchConfig) -> FetchResult<Self> {
        let upstream = HttpUpstream::new(config.clone())?;
        Ok(Self::new(default_library(), Arc::new(upstream), config))
    }

    /// Retrieve a transcript. Always returns exactly one outcome along with
    /// the diagnostics gathered on the way.
    #[instrument(skip(self, video_id, languages), fields(video_id = %video_id))]
    pub async fn retrieve(
        &self,
        video_id: &VideoId,
        languages: &LanguageCandidates,
    ) -> RetrievalReport {
        let mut diagnostics = Diagnostics::new();
        let library_deadline = Instant::now() + self.library_budget;

        let mut step = if self.primary.is_available() {
            Step::TryPrimary(0)
        } else {
            diagnostics.lib = Some(LibraryStatus::Unavailable);
            Step::TryWatchPage
        };

        loop {
            step = match step {
                Step::TryPrimary(index) => {
                    self.try_primary(video_id, languages, index, library_deadline, &mut diagnostics)
                        .await
                }
                Step::TryWatchPage => {
                    debug!("Falling back to watch page");
                    match self.secondary.run(video_id, languages, &mut diagnostics).await {
                        Ok(transcript) => Step::Done(RetrievalOutcome::Success(transcript)),
                        Err(reason) => Step::Done(RetrievalOutcome::Failure(reason)),
                    }
                }
                Step::Done(outcome) => {
                    record_outcome(&outcome);
                    return RetrievalReport {
                        outcome,
                        diagnostics,
                    };
                }
            };
        }
    }

    async fn try_primary(
        &self,
        video_id: &VideoId,
        languages: &LanguageCandidates,
        index: usize,
        deadline: Instant,
        diagnostics: &mut Diagnostics,
    ) -> Step {
        let Some(candidate) = languages.get(index) else {
            diagnostics.lib.get_or_insert(LibraryStatus::Miss);
            return Step::TryWatchPage;
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!(
                budget_ms = self.library_budget.as_millis() as u64,
                skipped = languages.len() - index,
                "Transcript library budget exhausted"
            );
            diagnostics.lib = Some(LibraryStatus::Miss);
            diagnostics.lib_err = Some("library budget exhausted".to_string());
            return Step::TryWatchPage;
        }

        let label = candidate.to_string();
        diagnostics.tried_langs.push(label.clone());
        debug!(language = %label, library = self.primary.name(), "Trying transcript library");

        match self.primary.attempt_within(video_id, candidate, remaining).await {
            Ok(transcript) => {
                counter!(names::LIBRARY_ATTEMPTS_TOTAL, "result" => "hit").increment(1);
                diagnostics.lib = Some(LibraryStatus::Hit);
                Step::Done(RetrievalOutcome::Success(transcript))
            }
            Err(FetchError::LibraryUnavailable) => {
                diagnostics.lib = Some(LibraryStatus::Unavailable);
                Step::TryWatchPage
            }
            Err(e) => {
                counter!(names::LIBRARY_ATTEMPTS_TOTAL, "result" => "miss").increment(1);
                warn!(language = %label, error = %e, "Transcript library attempt failed");
                diagnostics.record_library_failure(label, e.to_string());
                Step::TryPrimary(index + 1)
            }
        }
    }
}

fn record_outcome(outcome: &RetrievalOutcome) {
    match outcome {
        RetrievalOutcome::Success(transcript) => {
            counter!(
                names::TRANSCRIPT_OUTCOMES_TOTAL,
                "result" => "success",
                "path" => transcript.path.as_str()
            )
            .increment(1);
            info!(
                path = %transcript.path,
                language = %transcript.language,
                segments = transcript.segments.len(),
                "Transcript retrieved"
            );
        }
        RetrievalOutcome::Failure(reason) => {
            counter!(
                names::TRANSCRIPT_OUTCOMES_TOTAL,
                "result" => "failure",
                "reason" => reason.as_str()
            )
            .increment(1);
            info!(reason = %reason, "Transcript unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{MockTranscriptLibrary, TranscriptLibrary};
    use crate::parser::{LibraryCue, TimedTextDocument};
    use crate::upstream::MockUpstream;
    use async_trait::async_trait;
    use mockall::Sequence;
    use std::time::Duration;
    use tscript_models::{
        LanguageCandidate, LanguagePreferenceBuilder, PathUsed, ReasonCode, TranscriptKind,
    };

    const WATCH_PAGE: &str = r#"var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?lang=en","languageCode":"en","kind":"asr"}]}}};"#;

    fn video_id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    fn languages(hint: Option<&str>) -> LanguageCandidates {
        LanguagePreferenceBuilder::new(["en", "es"]).build(hint)
    }

    fn cues() -> Vec<LibraryCue> {
        vec![LibraryCue {
            text: "hola".to_string(),
            offset: 0.0,
            duration: 1.0,
        }]
    }

    fn available_library() -> MockTranscriptLibrary {
        let mut library = MockTranscriptLibrary::new();
        library.expect_is_available().return_const(true);
        library.expect_name().return_const("mock");
        library
    }

    fn orchestrator(library: MockTranscriptLibrary, upstream: MockUpstream) -> RetrievalOrchestrator {
        let config = FetchConfig {
            library_timeout: Duration::from_secs(1),
            ..Default::default()
        };
        RetrievalOrchestrator::new(Arc::new(library), Arc::new(upstream), &config)
    }

    #[tokio::test]
    async fn test_library_success_skips_watch_page() {
        let mut library = available_library();
        let mut seq = Sequence::new();
        library
            .expect_fetch()
            .withf(|_, lang: &LanguageCandidate| lang.tag() == Some("en"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(FetchError::library("no transcript")));
        library
            .expect_fetch()
            .withf(|_, lang: &LanguageCandidate| lang.tag() == Some("es"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(cues()));

        let mut upstream = MockUpstream::new();
        upstream.expect_fetch_watch_page().times(0);
        upstream.expect_fetch_caption_payload().times(0);

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(None))
            .await;

        let RetrievalOutcome::Success(transcript) = report.outcome else {
            panic!("expected success");
        };
        assert_eq!(transcript.path, PathUsed::Library);
        assert_eq!(transcript.language, "es");
        assert_eq!(report.diagnostics.lib, Some(LibraryStatus::Hit));
        assert_eq!(report.diagnostics.tried_langs, vec!["en", "es"]);
        assert_eq!(report.diagnostics.lib_attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_first_candidate_success_stops_loop() {
        let mut library = available_library();
        library.expect_fetch().times(1).returning(|_, _| Ok(cues()));

        let mut upstream = MockUpstream::new();
        upstream.expect_fetch_watch_page().times(0);

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(Some("de")))
            .await;

        assert!(report.outcome.is_success());
        assert_eq!(report.diagnostics.tried_langs, vec!["de"]);
    }

    #[tokio::test]
    async fn test_library_exhausted_falls_back_to_watch_page() {
        let mut library = available_library();
        library
            .expect_fetch()
            .times(2)
            .returning(|_, _| Err(FetchError::library("Transcript is disabled")));

        let mut upstream = MockUpstream::new();
        upstream
            .expect_fetch_watch_page()
            .times(1)
            .returning(|_| Ok(WATCH_PAGE.to_string()));
        upstream.expect_fetch_caption_payload().times(1).returning(|_| {
            Ok(serde_json::from_str::<TimedTextDocument>(
                r#"{"events":[{"tStartMs":1500,"dDurationMs":500,"segs":[{"utf8":"hi"}]}]}"#,
            )
            .unwrap())
        });

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(None))
            .await;

        let RetrievalOutcome::Success(transcript) = report.outcome else {
            panic!("expected success");
        };
        assert_eq!(transcript.path, PathUsed::Watchpage);
        assert_eq!(transcript.kind, TranscriptKind::Asr);
        assert_eq!(transcript.segments[0].start, 1.5);
        assert_eq!(report.diagnostics.lib, Some(LibraryStatus::Miss));
        assert_eq!(report.diagnostics.lib_err.as_deref(), Some("Transcript library error: Transcript is disabled"));
    }

    #[tokio::test]
    async fn test_unavailable_library_goes_straight_to_watch_page() {
        let mut library = MockTranscriptLibrary::new();
        library.expect_is_available().return_const(false);
        library.expect_fetch().times(0);

        let mut upstream = MockUpstream::new();
        upstream
            .expect_fetch_watch_page()
            .times(1)
            .returning(|_| Err(FetchError::Status { status: 403 }));

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(None))
            .await;

        assert_eq!(report.outcome.reason(), Some(ReasonCode::BlockedUpstream));
        assert_eq!(report.diagnostics.lib, Some(LibraryStatus::Unavailable));
        assert_eq!(
            report.diagnostics.upstream.as_deref(),
            Some("watchpage_fetch_failed:403")
        );
    }

    #[tokio::test]
    async fn test_library_timeout_counts_as_failed_attempt() {
        let mut library = available_library();
        library.expect_fetch().returning(|_, _| Err(FetchError::Timeout(Duration::from_secs(1))));

        let mut upstream = MockUpstream::new();
        upstream
            .expect_fetch_watch_page()
            .times(1)
            .returning(|_| Ok(WATCH_PAGE.to_string()));
        upstream
            .expect_fetch_caption_payload()
            .times(1)
            .returning(|_| Err(FetchError::Status { status: 404 }));

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(None))
            .await;

        assert_eq!(report.outcome.reason(), Some(ReasonCode::NoCaptions));
        assert_eq!(report.diagnostics.lib_attempts.len(), 2);
        assert_eq!(report.diagnostics.status, Some(404));
    }

    #[tokio::test]
    async fn test_unconstrained_candidate_is_tried_last() {
        let mut library = available_library();
        let mut seq = Sequence::new();
        library
            .expect_fetch()
            .withf(|_, lang: &LanguageCandidate| lang.tag().is_some())
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(FetchError::library("not found")));
        library
            .expect_fetch()
            .withf(|_, lang: &LanguageCandidate| *lang == LanguageCandidate::Any)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(cues()));

        let mut upstream = MockUpstream::new();
        upstream.expect_fetch_watch_page().times(0);

        let report = orchestrator(library, upstream)
            .retrieve(&video_id(), &languages(Some("*")))
            .await;

        let RetrievalOutcome::Success(transcript) = report.outcome else {
            panic!("expected success");
        };
        assert_eq!(transcript.language, "unknown");
        assert_eq!(report.diagnostics.tried_langs, vec!["en", "es", "*"]);
    }

    /// Library whose fetch never completes.
    struct StalledLibrary;

    #[async_trait]
    impl TranscriptLibrary for StalledLibrary {
        fn name(&self) -> &'static str {
            "stalled"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn fetch(
            &self,
            _video_id: &VideoId,
            _language: &LanguageCandidate,
        ) -> FetchResult<Vec<LibraryCue>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_library_budget_bounds_primary_phase() {
        let mut upstream = MockUpstream::new();
        upstream
            .expect_fetch_watch_page()
            .times(1)
            .returning(|_| Err(FetchError::Status { status: 403 }));

        let config = FetchConfig {
            library_timeout: Duration::from_millis(200),
            library_budget: Duration::from_millis(300),
            ..Default::default()
        };
        let orchestrator =
            RetrievalOrchestrator::new(Arc::new(StalledLibrary), Arc::new(upstream), &config);
        let languages = LanguagePreferenceBuilder::new(["en", "es", "de", "fr", "pt", "it"]).build(None);

        let started = Instant::now();
        let report = orchestrator.retrieve(&video_id(), &languages).await;

        assert!(started.elapsed() < Duration::from_millis(1200));
        assert_eq!(report.outcome.reason(), Some(ReasonCode::BlockedUpstream));
        assert!(report.diagnostics.tried_langs.len() < languages.len());
        assert_eq!(report.diagnostics.lib, Some(LibraryStatus::Miss));
        assert_eq!(
            report.diagnostics.lib_err.as_deref(),
            Some("library budget exhausted")
        );
        assert_eq!(
            report.diagnostics.upstream.as_deref(),
            Some("watchpage_fetch_failed:403")
        );
    }
}
