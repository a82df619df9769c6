//! Watch page scraping.
//!
//! The watch page embeds the player configuration as a script assignment
//! (`var ytInitialPlayerResponse = {...};`). Only the caption track list and
//! the video title are read from it.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tscript_models::{CaptionTrack, TrackKind};

use crate::error::{FetchError, FetchResult};

fn player_response_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"ytInitialPlayerResponse\s*=\s*\{").expect("player response marker regex is valid")
    })
}

/// The subset of the embedded player response this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    captions: Option<Captions>,
    #[serde(default)]
    video_details: Option<RawVideoDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: Option<String>,
    #[serde(default)]
    language_code: String,
    kind: Option<String>,
    name: Option<TrackName>,
    vss_id: Option<String>,
}

/// Track label; upstream uses either `simpleText` or a list of text runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TextRun {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawVideoDetails {
    title: Option<String>,
}

impl TrackName {
    fn label(&self) -> Option<String> {
        let label = match &self.simple_text {
            Some(text) => text.clone(),
            None => self.runs.iter().map(|r| r.text.as_str()).collect(),
        };
        let label = label.trim();
        (!label.is_empty()).then(|| label.to_string())
    }
}

impl RawCaptionTrack {
    fn kind(&self) -> TrackKind {
        let asr = match self.kind.as_deref() {
            Some(kind) => kind.eq_ignore_ascii_case("asr"),
            None => self.vss_id.as_deref().is_some_and(|v| v.starts_with("a.")),
        };
        if asr {
            TrackKind::Asr
        } else {
            TrackKind::Manual
        }
    }

    fn into_track(self) -> Option<CaptionTrack> {
        let kind = self.kind();
        let source_locator = self.base_url.filter(|u| !u.trim().is_empty())?;
        Some(CaptionTrack {
            language_code: self.language_code,
            kind,
            name: self.name.as_ref().and_then(TrackName::label),
            source_locator,
        })
    }
}

impl PlayerResponse {
    /// Caption tracks in upstream order. Entries without a locator are skipped.
    pub fn caption_tracks(&self) -> Vec<CaptionTrack> {
        self.captions
            .as_ref()
            .and_then(|c| c.player_captions_tracklist_renderer.as_ref())
            .map(|r| {
                r.caption_tracks
                    .iter()
                    .cloned()
                    .filter_map(RawCaptionTrack::into_track)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn title(&self) -> Option<&str> {
        self.video_details.as_ref().and_then(|d| d.title.as_deref())
    }
}

/// Extract the embedded player response from watch page HTML.
///
/// Exactly one JSON value is read starting at the assignment, so whatever
/// script follows it is ignored.
pub fn extract_player_response(html: &str) -> FetchResult<PlayerResponse> {
    let found = player_response_marker()
        .find(html)
        .ok_or(FetchError::PlayerResponseNotFound)?;

    // match ends just past the opening brace
    let json = &html[found.end() - 1..];
    serde_json::Deserializer::from_str(json)
        .into_iter::<PlayerResponse>()
        .next()
        .ok_or(FetchError::PlayerResponseNotFound)?
        .map_err(FetchError::PlayerResponseMalformed)
}
