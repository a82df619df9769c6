//! Shared data models for the tscript transcript service.
//!
//! This crate provides:
//! - Video identifier resolution from bare IDs and URLs
//! - Language preference lists
//! - Caption track descriptors and normalized transcript segments
//! - Retrieval outcomes, reason codes and diagnostics

pub mod diagnostics;
pub mod language;
pub mod outcome;
pub mod segment;
pub mod track;
pub mod video_id;

// Re-export common types
pub use diagnostics::{Diagnostics, LanguageAttempt, LibraryStatus, SelectedTrack, VideoDetails};
pub use language::{
    split_language_list, LanguageCandidate, LanguageCandidates, LanguagePreferenceBuilder,
    DEFAULT_LANGUAGES,
};
pub use outcome::{PathUsed, ReasonCode, RetrievalOutcome, RetrievalReport, Transcript, TranscriptKind};
pub use segment::{collapse_whitespace, sort_segments, TranscriptSegment};
pub use track::{CaptionTrack, TrackKind};
pub use video_id::{is_valid_video_id, resolve_video_id, VideoId, VideoIdError, VideoIdResult};
