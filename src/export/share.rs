//! Share links.
//!
//! A deck travels as the URL fragment: JSON of its `{term, definition}` pairs,
//! base64 encoded with the URL-safe substitutions (`+` to `-`, `/` to `_`) and
//! the `=` padding stripped. Decks with non-default settings are wrapped in an
//! object `{"cards": [...], "settings": {...}}`.

use crate::models::{DeckSettings, Flashcard};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Share link is empty")]
    Empty,
    #[error("Share link has an invalid length ({0})")]
    InvalidLength(usize),
    #[error("Share link is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Share link is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Share link does not contain a deck: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SharePayload {
    Cards(Vec<Flashcard>),
    Deck {
        cards: Vec<Flashcard>,
        #[serde(default)]
        settings: DeckSettings,
    },
}

/// Deck contents recovered from a share link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedDeck {
    pub flashcards: Vec<Flashcard>,
    pub settings: DeckSettings,
    /// Entries dropped because a side was empty.
    pub skipped: usize,
}

pub fn encode_deck(flashcards: &[Flashcard], settings: DeckSettings) -> Result<String, ShareError> {
    let json = if settings == DeckSettings::default() {
        serde_json::to_string(flashcards)?
    } else {
        serde_json::to_string(&SharePayload::Deck {
            cards: flashcards.to_vec(),
            settings,
        })?
    };
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_fragment(fragment: &str) -> Result<SharedDeck, ShareError> {
    let fragment = fragment.trim().trim_end_matches('=');
    if fragment.is_empty() {
        return Err(ShareError::Empty);
    }

    let mut standard: String = fragment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    match standard.len() % 4 {
        0 => {}
        2 => standard.push_str("=="),
        3 => standard.push('='),
        _ => return Err(ShareError::InvalidLength(fragment.len())),
    }

    let bytes = STANDARD.decode(standard)?;
    let json = String::from_utf8(bytes)?;
    let (cards, settings) = match serde_json::from_str(&json)? {
        SharePayload::Cards(cards) => (cards, DeckSettings::default()),
        SharePayload::Deck { cards, settings } => (cards, settings),
    };

    let total = cards.len();
    let flashcards: Vec<Flashcard> = cards
        .iter()
        .filter_map(|c| Flashcard::new(&c.term, &c.definition))
        .collect();

    Ok(SharedDeck {
        skipped: total - flashcards.len(),
        flashcards,
        settings,
    })
}

/// Fragment part of a share link, or the whole input if it has no `#`.
pub fn fragment_of(link: &str) -> &str {
    let link = link.trim();
    match link.split_once('#') {
        Some((_, fragment)) => fragment,
        None => link,
    }
}

pub fn share_url(base_url: &str, fragment: &str) -> String {
    let base = base_url.split('#').next().unwrap_or_default();
    format!("{base}#{fragment}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> Vec<Flashcard> {
        vec![
            Flashcard::new("Dog", "Canine").unwrap(),
            Flashcard::new("żółw", "turtle?>>").unwrap(),
            Flashcard::new("a/b", "c+d").unwrap(),
        ]
    }

    #[test]
    fn test_roundtrip() {
        let encoded = encode_deck(&deck(), DeckSettings::default()).unwrap();
        let decoded = decode_fragment(&encoded).unwrap();

        assert_eq!(decoded.flashcards, deck());
        assert_eq!(decoded.settings, DeckSettings::default());
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_encoding_is_url_safe() {
        let encoded = encode_deck(&deck(), DeckSettings::default()).unwrap();
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        assert!(!encoded.ends_with('='));

        let json = serde_json::to_string(&deck()).unwrap();
        let standard = STANDARD.encode(json);
        let expected = standard.replace('+', "-").replace('/', "_");
        assert_eq!(encoded, expected.trim_end_matches('='));
    }

    #[test]
    fn test_default_settings_encode_as_array() {
        let encoded = encode_deck(&deck()[..1], DeckSettings::default()).unwrap();
        let json = String::from_utf8(URL_SAFE_NO_PAD.decode(encoded).unwrap()).unwrap();
        assert_eq!(json, r#"[{"term":"Dog","definition":"Canine"}]"#);
    }

    #[test]
    fn test_settings_roundtrip() {
        let settings = DeckSettings {
            shuffle_on_load: true,
            start_side_is_term: false,
        };
        let encoded = encode_deck(&deck(), settings).unwrap();
        let decoded = decode_fragment(&encoded).unwrap();
        assert_eq!(decoded.settings, settings);
        assert_eq!(decoded.flashcards, deck());
    }

    #[test]
    fn test_standard_padded_fragment_is_accepted() {
        let json = r#"[{"term":"a","definition":"b"}]"#;
        let fragment = STANDARD.encode(json);
        let decoded = decode_fragment(&fragment).unwrap();
        assert_eq!(decoded.flashcards, vec![Flashcard::new("a", "b").unwrap()]);
    }

    #[test]
    fn test_padding_is_restored() {
        // "[]" encodes to "W10=", three characters once unpadded
        let decoded = decode_fragment("W10").unwrap();
        assert!(decoded.flashcards.is_empty());

        // "[ ]" encodes to "WyBd", a multiple of four
        assert!(decode_fragment("WyBd").unwrap().flashcards.is_empty());

        // "[  ]" encodes to "WyAgXQ==", two characters short of a block
        let decoded = decode_fragment("WyAgXQ").unwrap();
        assert!(decoded.flashcards.is_empty());
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_empty_entries_are_skipped() {
        let json = r#"[{"term":"a","definition":"b"},{"term":" ","definition":"x"}]"#;
        let decoded = decode_fragment(&URL_SAFE_NO_PAD.encode(json)).unwrap();
        assert_eq!(decoded.flashcards.len(), 1);
        assert_eq!(decoded.skipped, 1);
    }

    #[test]
    fn test_invalid_fragments() {
        assert!(matches!(decode_fragment(""), Err(ShareError::Empty)));
        assert!(matches!(decode_fragment("abcde"), Err(ShareError::InvalidLength(5))));
        assert!(matches!(decode_fragment("!!!!"), Err(ShareError::Base64(_))));
        let not_a_deck = URL_SAFE_NO_PAD.encode(r#"{"hello":1}"#);
        assert!(matches!(decode_fragment(&not_a_deck), Err(ShareError::Json(_))));
    }

    #[test]
    fn test_fragment_of() {
        assert_eq!(fragment_of("https://example.org/cards/#abc"), "abc");
        assert_eq!(fragment_of("  abc "), "abc");
        assert_eq!(fragment_of("https://example.org/#"), "");
    }

    #[test]
    fn test_share_url() {
        assert_eq!(share_url("https://example.org/", "abc"), "https://example.org/#abc");
        assert_eq!(share_url("https://example.org/#old", "abc"), "https://example.org/#abc");
    }
}
