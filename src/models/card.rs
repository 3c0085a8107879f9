//! Wrapper for flashcards that tracks learning progress.
use super::{Flashcard, ReviewState};

pub type CardId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub flashcard: Flashcard,
    pub review: ReviewState,
}

impl Card {
    pub fn new(id: CardId, flashcard: Flashcard) -> Self {
        Self {
            id,
            flashcard,
            review: ReviewState::default(),
        }
    }

    pub fn term(&self) -> &str {
        &self.flashcard.term
    }

    pub fn definition(&self) -> &str {
        &self.flashcard.definition
    }

    pub fn identity(&self) -> String {
        self.flashcard.identity()
    }
}
