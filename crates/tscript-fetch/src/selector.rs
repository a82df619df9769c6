//! Caption track selection.

use tscript_models::{CaptionTrack, LanguageCandidates};

/// Pick one track from `tracks` for the given preferences.
///
/// Tiers, first non-empty wins:
/// 1. manual track in a requested language
/// 2. ASR track in a requested language
/// 3. manual English track
/// 4. ASR English track
/// 5. the first track
///
/// Within a tier the upstream order decides. Returns `None` only for an empty
/// track list.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &LanguageCandidates,
) -> Option<&'a CaptionTrack> {
    let requested = |t: &&CaptionTrack| languages.accepts(&t.language_code);

    tracks
        .iter()
        .filter(requested)
        .find(|t| t.is_manual())
        .or_else(|| tracks.iter().filter(requested).find(|t| t.is_asr()))
        .or_else(|| tracks.iter().find(|t| t.is_manual() && t.is_english()))
        .or_else(|| tracks.iter().find(|t| t.is_asr() && t.is_english()))
        .or_else(|| tracks.first())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tscript_models::{LanguagePreferenceBuilder, TrackKind};

    fn track(code: &str, kind: TrackKind) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            kind,
            name: None,
            source_locator: format!("https://example.com/{}/{}", code, kind),
        }
    }

    fn langs(hint: &str, defaults: &[&str]) -> LanguageCandidates {
        LanguagePreferenceBuilder::new(defaults).build(Some(hint))
    }

    fn pick<'a>(tracks: &'a [CaptionTrack], languages: &LanguageCandidates) -> (&'a str, TrackKind) {
        let t = select_track(tracks, languages).unwrap();
        (t.language_code.as_str(), t.kind)
    }

    #[test]
    fn test_manual_requested_beats_asr_requested() {
        let tracks = vec![track("de", TrackKind::Asr), track("de", TrackKind::Manual)];
        assert_eq!(pick(&tracks, &langs("de", &["de"])), ("de", TrackKind::Manual));
    }

    #[test]
    fn test_asr_requested_beats_manual_english() {
        let tracks = vec![track("en", TrackKind::Manual), track("de", TrackKind::Asr)];
        assert_eq!(pick(&tracks, &langs("de", &["de"])), ("de", TrackKind::Asr));
    }

    #[test]
    fn test_english_fallback_tiers() {
        let tracks = vec![
            track("ja", TrackKind::Manual),
            track("en-US", TrackKind::Asr),
            track("EN-gb", TrackKind::Manual),
        ];
        assert_eq!(pick(&tracks, &langs("ko", &["ko"])), ("EN-gb", TrackKind::Manual));

        let tracks = vec![track("ja", TrackKind::Manual), track("en", TrackKind::Asr)];
        assert_eq!(pick(&tracks, &langs("ko", &["ko"])), ("en", TrackKind::Asr));
    }

    #[test]
    fn test_first_track_last_resort() {
        let tracks = vec![track("ja", TrackKind::Asr), track("ko", TrackKind::Manual)];
        assert_eq!(pick(&tracks, &langs("pt", &["pt"])), ("ja", TrackKind::Asr));
    }

    #[test]
    fn test_language_match_is_case_insensitive() {
        let tracks = vec![track("en", TrackKind::Manual), track("PT-br", TrackKind::Manual)];
        assert_eq!(pick(&tracks, &langs("pt-BR", &["pt-BR"])), ("PT-br", TrackKind::Manual));
    }

    #[test]
    fn test_unconstrained_matches_every_track() {
        let tracks = vec![track("ja", TrackKind::Asr), track("ko", TrackKind::Manual)];
        assert_eq!(pick(&tracks, &langs("*", &["fr"])), ("ko", TrackKind::Manual));
    }

    #[test]
    fn test_empty_track_list() {
        assert!(select_track(&[], &langs("en", &["en"])).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let tracks = vec![
            track("fr", TrackKind::Asr),
            track("es", TrackKind::Manual),
            track("en", TrackKind::Asr),
        ];
        let languages = langs("fr,es", &["en"]);
        let first = select_track(&tracks, &languages).unwrap();
        for _ in 0..10 {
            assert_eq!(select_track(&tracks, &languages).unwrap(), first);
        }
        assert_eq!(first.language_code, "es");
    }
}
