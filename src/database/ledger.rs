//! Progress ledger: review state of every card, keyed by `term|definition`.

use super::storage::{StorageResult, get_item, remove_item, set_item};
use crate::models::{Card, ReviewState};
use rusqlite::Connection;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

pub const PROGRESS_KEY: &str = "flashcardAppProgress";

/// Reads stored progress. Missing or unreadable data gives an empty map.
pub fn load_progress(conn: &Connection) -> HashMap<String, ReviewState> {
    let raw = match get_item(PROGRESS_KEY, conn) {
        Ok(Some(raw)) => raw,
        Ok(None) => return HashMap::new(),
        Err(e) => {
            warn!("Could not read stored progress: {e}");
            return HashMap::new();
        }
    };

    match serde_json::from_str::<HashMap<String, ReviewState>>(&raw) {
        Ok(progress) => {
            debug!("Loaded progress for {} cards", progress.len());
            progress
        }
        Err(e) => {
            warn!("Ignoring malformed stored progress: {e}");
            HashMap::new()
        }
    }
}

/// Replaces stored progress with the state of `cards`.
pub fn save_progress(cards: &[Card], conn: &Connection) -> StorageResult<()> {
    // Sorted keys keep the stored JSON stable between saves
    let progress: BTreeMap<String, ReviewState> =
        cards.iter().map(|c| (c.identity(), c.review)).collect();
    let json = serde_json::to_string(&progress)?;
    set_item(PROGRESS_KEY, &json, conn)
}

pub fn clear_progress(conn: &Connection) -> StorageResult<()> {
    remove_item(PROGRESS_KEY, conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::storage::open_in_memory;
    use crate::models::Flashcard;

    fn card(term: &str, definition: &str, score: u8) -> Card {
        let mut card = Card::new(0, Flashcard::new(term, definition).unwrap());
        card.review = ReviewState {
            score,
            last_reviewed: Some(7),
            next_review: 70,
        };
        card
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let conn = open_in_memory().unwrap();
        assert!(load_progress(&conn).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let conn = open_in_memory().unwrap();
        let cards = vec![card("Dog", "Canine", 2), card("Cat", "Feline", 5)];

        save_progress(&cards, &conn).unwrap();
        let progress = load_progress(&conn);

        assert_eq!(progress.len(), 2);
        assert_eq!(progress["Cat|Feline"].score, 5);
        assert_eq!(progress["Dog|Canine"].last_reviewed, Some(7));
    }

    #[test]
    fn test_save_rewrites_in_full() {
        let conn = open_in_memory().unwrap();
        save_progress(&[card("Dog", "Canine", 2)], &conn).unwrap();
        save_progress(&[card("Cat", "Feline", 1)], &conn).unwrap();

        let progress = load_progress(&conn);
        assert_eq!(progress.len(), 1);
        assert!(progress.contains_key("Cat|Feline"));
    }

    #[test]
    fn test_stored_format() {
        let conn = open_in_memory().unwrap();
        save_progress(&[card("Dog", "Canine", 2)], &conn).unwrap();
        let raw = get_item(PROGRESS_KEY, &conn).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"{"Dog|Canine":{"score":2,"lastReviewed":7,"nextReview":70}}"#
        );
    }

    #[test]
    fn test_malformed_data_loads_empty() {
        let conn = open_in_memory().unwrap();
        set_item(PROGRESS_KEY, "{not json", &conn).unwrap();
        assert!(load_progress(&conn).is_empty());

        set_item(PROGRESS_KEY, "[1, 2, 3]", &conn).unwrap();
        assert!(load_progress(&conn).is_empty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let conn = open_in_memory().unwrap();
        conn.execute("DROP TABLE app_state", ()).unwrap();

        assert!(save_progress(&[card("Dog", "Canine", 1)], &conn).is_err());
        // Reads degrade to empty instead of failing
        assert!(load_progress(&conn).is_empty());
    }

    #[test]
    fn test_clear_progress() {
        let conn = open_in_memory().unwrap();
        save_progress(&[card("Dog", "Canine", 2)], &conn).unwrap();
        clear_progress(&conn).unwrap();
        assert!(load_progress(&conn).is_empty());
    }
}
