//! Retrieval strategies.
//!
//! [`PrimaryStrategy`] asks the transcript library for one language at a time.
//! [`SecondaryStrategy`] scrapes the watch page, selects a caption track and
//! fetches its payload.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use tscript_models::{
    Diagnostics, LanguageCandidate, LanguageCandidates, PathUsed, ReasonCode, SelectedTrack,
    Transcript, TranscriptKind, VideoDetails, VideoId,
};

use crate::error::{FetchError, FetchResult};
use crate::library::TranscriptLibrary;
use crate::parser::{parse_library_cues, parse_timed_text};
use crate::selector::select_track;
use crate::upstream::Upstream;
use crate::watch_page::extract_player_response;

/// Language reported when the library picked the language itself.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Library-backed strategy.
pub struct PrimaryStrategy {
    library: Arc<dyn TranscriptLibrary>,
    timeout: Duration,
}

impl PrimaryStrategy {
    pub fn new(library: Arc<dyn TranscriptLibrary>, timeout: Duration) -> Self {
        Self { library, timeout }
    }

    pub fn is_available(&self) -> bool {
        self.library.is_available()
    }

    pub fn name(&self) -> &'static str {
        self.library.name()
    }

    /// One attempt for one language candidate. An empty result is an error so
    /// the caller moves on to the next candidate.
    pub async fn attempt(
        &self,
        video_id: &VideoId,
        candidate: &LanguageCandidate,
    ) -> FetchResult<Transcript> {
        self.attempt_within(video_id, candidate, self.timeout).await
    }

    /// Like [`attempt`](Self::attempt), bounded by `limit` when it is shorter
    /// than the per-language timeout.
    pub async fn attempt_within(
        &self,
        video_id: &VideoId,
        candidate: &LanguageCandidate,
        limit: Duration,
    ) -> FetchResult<Transcript> {
        let timeout = self.timeout.min(limit);
        let cues = tokio::time::timeout(timeout, self.library.fetch(video_id, candidate))
            .await
            .map_err(|_| FetchError::Timeout(timeout))??;

        let segments = parse_library_cues(&cues);
        if segments.is_empty() {
            return Err(FetchError::library("empty transcript"));
        }

        Ok(Transcript {
            segments,
            path: PathUsed::Library,
            language: candidate.tag().unwrap_or(UNKNOWN_LANGUAGE).to_string(),
            kind: TranscriptKind::Unknown,
        })
    }
}

/// Watch page scraping strategy.
pub struct SecondaryStrategy {
    upstream: Arc<dyn Upstream>,
}

impl SecondaryStrategy {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Run the watch page flow to a transcript or a terminal reason.
    pub async fn run(
        &self,
        video_id: &VideoId,
        languages: &LanguageCandidates,
        diagnostics: &mut Diagnostics,
    ) -> Result<Transcript, ReasonCode> {
        let player = match self.upstream.fetch_watch_page(video_id).await {
            Ok(html) => extract_player_response(&html),
            Err(e) => Err(e),
        };
        let player = player.map_err(|e| {
            warn!(error = %e, "Watch page unusable");
            diagnostics.upstream = Some(e.watch_page_code());
            ReasonCode::BlockedUpstream
        })?;

        diagnostics.video_details = Some(VideoDetails {
            title: player.title().map(str::to_string),
        });

        let tracks = player.caption_tracks();
        if tracks.is_empty() {
            diagnostics.note = Some("no captionTracks".to_string());
            return Err(ReasonCode::NoCaptions);
        }
        diagnostics.available = tracks.iter().map(|t| t.language_code.clone()).collect();

        let Some(track) = select_track(&tracks, languages) else {
            return Err(ReasonCode::NoCaptions);
        };
        debug!(
            language = %track.language_code,
            kind = %track.kind,
            "Selected caption track"
        );
        diagnostics.selected_track = Some(SelectedTrack::from(track));

        let document = self
            .upstream
            .fetch_caption_payload(&track.source_locator)
            .await
            .map_err(|e| {
                warn!(error = %e, "Caption payload fetch failed");
                diagnostics.status = e.status();
                if matches!(e, FetchError::Payload(_)) {
                    diagnostics.note = Some("payload_parse_error".to_string());
                }
                payload_failure_reason(&e)
            })?;

        let segments = parse_timed_text(&document);
        if segments.is_empty() {
            diagnostics.note = Some("empty events".to_string());
            return Err(ReasonCode::NoCaptions);
        }

        Ok(Transcript {
            segments,
            path: PathUsed::Watchpage,
            language: track.language_code.clone(),
            kind: track.kind.into(),
        })
    }
}

/// Reason for a failed caption payload fetch: 404 and undecodable payloads
/// mean no usable captions, anything else points at the upstream.
pub fn payload_failure_reason(error: &FetchError) -> ReasonCode {
    match error {
        FetchError::Status { status: 404 } | FetchError::Payload(_) => ReasonCode::NoCaptions,
        _ => ReasonCode::BlockedUpstream,
    }
}
