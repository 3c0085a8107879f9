//! Multiple-choice options for learn and review questions.

use super::Card;
use rand::Rng;
use rand::seq::SliceRandom;

/// A question shown in learn or review mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    /// Deck index of the card being asked.
    pub card_index: usize,
    pub prompt: String,
    pub answer: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn new<R: Rng + ?Sized>(
        cards: &[Card],
        card_index: usize,
        option_count: usize,
        rng: &mut R,
    ) -> Option<Self> {
        let card = cards.get(card_index)?;
        Some(Self {
            card_index,
            prompt: card.term().to_string(),
            answer: card.definition().to_string(),
            options: generate_options(cards, card_index, option_count, rng),
        })
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.answer
    }
}

/// Target definition plus distractors from other cards, in random order.
///
/// Distractors are drawn without replacement. Repeated definition text is only
/// offered once, so a deck with duplicates may produce fewer options.
pub fn generate_options<R: Rng + ?Sized>(
    cards: &[Card],
    target: usize,
    option_count: usize,
    rng: &mut R,
) -> Vec<String> {
    let Some(target_card) = cards.get(target) else {
        return Vec::new();
    };

    let mut pool: Vec<&Card> = cards.iter().filter(|c| c.id != target_card.id).collect();
    pool.shuffle(rng);

    let mut options = vec![target_card.definition().to_string()];
    for card in pool {
        if options.len() >= option_count {
            break;
        }
        if !options.iter().any(|o| o == card.definition()) {
            options.push(card.definition().to_string());
        }
    }

    options.shuffle(rng);
    options
}
