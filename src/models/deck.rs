//! Deck is the ordered set of cards being studied, plus its display settings
use super::{Card, Flashcard, ReviewState};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    #[serde(default)]
    pub shuffle_on_load: bool,
    #[serde(default = "default_true")]
    pub start_side_is_term: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            shuffle_on_load: false,
            start_side_is_term: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub settings: DeckSettings,
}

impl Deck {
    /// Builds the card store from imported pairs, restoring stored progress by identity.
    ///
    /// Cards are permuted first when `shuffle_on_load` is set, so ids follow the
    /// order the learner will actually see.
    pub fn build<R: Rng + ?Sized>(
        mut flashcards: Vec<Flashcard>,
        settings: DeckSettings,
        progress: &HashMap<String, ReviewState>,
        rng: &mut R,
    ) -> Self {
        if settings.shuffle_on_load {
            flashcards.shuffle(rng);
        }

        let cards = flashcards
            .into_iter()
            .enumerate()
            .map(|(index, flashcard)| {
                let mut card = Card::new(index as u64, flashcard);
                if let Some(state) = progress.get(&card.identity()) {
                    card.review = *state;
                    card.review.score = card.review.score.min(super::review_state::MAX_SCORE);
                }
                card
            })
            .collect();

        Self { cards, settings }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The bare pairs, in deck order, as shared in links.
    pub fn flashcards(&self) -> Vec<Flashcard> {
        self.cards.iter().map(|c| c.flashcard.clone()).collect()
    }

    pub fn reset_progress(&mut self) {
        for card in &mut self.cards {
            card.review = ReviewState::default();
        }
    }
}
