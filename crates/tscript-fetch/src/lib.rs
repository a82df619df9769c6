//! Transcript retrieval for tscript.
//!
//! This crate provides:
//! - Caption payload parsing (library cues and timed-event documents)
//! - Caption track selection
//! - Watch page scraping for the embedded player response
//! - The transcript library and upstream HTTP seams
//! - The retrieval orchestrator driving both strategies

pub mod config;
pub mod error;
pub mod library;
pub mod orchestrator;
pub mod parser;
pub mod selector;
pub mod strategy;
pub mod upstream;
pub mod watch_page;

pub use config::FetchConfig;
pub use error::{FetchError, FetchResult};
pub use library::{default_library, TranscriptLibrary, UnavailableLibrary};
#[cfg(feature = "library")]
pub use library::YtranscriptLibrary;
pub use orchestrator::RetrievalOrchestrator;
pub use parser::{parse_library_cues, parse_timed_text, LibraryCue, TimedTextDocument};
pub use selector::select_track;
pub use strategy::{PrimaryStrategy, SecondaryStrategy};
pub use upstream::{caption_payload_url, HttpUpstream, Upstream};
pub use watch_page::{extract_player_response, PlayerResponse};
