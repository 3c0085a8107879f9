//! Score-based spaced repetition.
//!
//! Each card carries a score from 0 to 5:
//! - A correct answer raises the score by one (capped at 5) and schedules the
//!   next review after the interval for the new score (5 min, 30 min, 1 day,
//!   3 days, 7 days by default)
//! - A wrong answer resets the score to 0 and makes the card due again after one minute
//! - Due-card selection prefers the weakest due card, and falls back to the
//!   weakest card overall so practice never blocks

use super::review_state::{MAX_SCORE, Millis};
use super::{Card, ReviewState};

const MINUTE: Millis = 60 * 1000;
const DAY: Millis = 24 * 60 * MINUTE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// Interval after a correct answer, indexed by the new score minus one.
    pub intervals: [Millis; MAX_SCORE as usize],
    pub incorrect_interval: Millis,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            intervals: [5 * MINUTE, 30 * MINUTE, DAY, 3 * DAY, 7 * DAY],
            incorrect_interval: MINUTE,
        }
    }
}

impl Schedule {
    /// Interval for a score in 1..=5. Score 0 only follows a miss.
    pub fn interval(&self, score: u8) -> Millis {
        match score {
            0 => self.incorrect_interval,
            s => self.intervals[(s.min(MAX_SCORE) - 1) as usize],
        }
    }

    /// Calculates the review state after an answer given at `now`.
    pub fn next_state(&self, state: &ReviewState, correct: bool, now: Millis) -> ReviewState {
        let score = if correct {
            state.score.saturating_add(1).min(MAX_SCORE)
        } else {
            0
        };

        ReviewState {
            score,
            last_reviewed: Some(now),
            next_review: now.saturating_add(self.interval(score)),
        }
    }

    pub fn answer(&self, card: &mut Card, correct: bool, now: Millis) {
        card.review = self.next_state(&card.review, correct, now);
    }
}

/// Picks the card to show outside a learn session.
///
/// Lowest score among due cards, or lowest score overall when nothing is due.
/// Ties keep deck order. `None` only for an empty deck.
pub fn next_due_card(cards: &[Card], now: Millis) -> Option<usize> {
    let weakest = |due_only: bool| {
        cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !due_only || card.review.is_due(now))
            .min_by_key(|(_, card)| card.review.score)
            .map(|(index, _)| index)
    };

    weakest(true).or_else(|| weakest(false))
}

pub fn due_count(cards: &[Card], now: Millis) -> usize {
    cards.iter().filter(|c| c.review.is_due(now)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flashcard;

    fn card(id: u64, score: u8, next_review: Millis) -> Card {
        let mut card = Card::new(id, Flashcard::new(&format!("t{id}"), &format!("d{id}")).unwrap());
        card.review.score = score;
        card.review.next_review = next_review;
        card
    }

    #[test]
    fn test_correct_answer_raises_score() {
        let schedule = Schedule::default();
        let now = 1_000_000;

        for score in 0..=MAX_SCORE {
            let state = ReviewState {
                score,
                last_reviewed: None,
                next_review: 0,
            };
            let next = schedule.next_state(&state, true, now);
            let expected = (score + 1).min(5);
            assert_eq!(next.score, expected);
            assert_eq!(next.next_review, now + schedule.interval(expected));
            assert_eq!(next.last_reviewed, Some(now));
        }
    }

    #[test]
    fn test_default_intervals() {
        let schedule = Schedule::default();
        assert_eq!(schedule.interval(1), 300_000);
        assert_eq!(schedule.interval(2), 1_800_000);
        assert_eq!(schedule.interval(3), 86_400_000);
        assert_eq!(schedule.interval(4), 259_200_000);
        assert_eq!(schedule.interval(5), 604_800_000);
    }

    #[test]
    fn test_incorrect_answer_resets() {
        let schedule = Schedule::default();
        let now = 5_000;

        for score in 0..=MAX_SCORE {
            let state = ReviewState {
                score,
                last_reviewed: Some(1),
                next_review: 99,
            };
            let next = schedule.next_state(&state, false, now);
            assert_eq!(next.score, 0);
            assert_eq!(next.next_review, now + 60_000);
            assert_eq!(next.last_reviewed, Some(now));
        }
    }

    #[test]
    fn test_answer_updates_card_in_place() {
        let schedule = Schedule::default();
        let mut c = card(0, 2, 0);
        schedule.answer(&mut c, true, 10);
        assert_eq!(c.review.score, 3);
        assert_eq!(c.review.next_review, 10 + DAY);
    }

    #[test]
    fn test_next_due_prefers_lowest_due_score() {
        let now = 1_000;
        let cards = vec![card(0, 3, 0), card(1, 1, now), card(2, 0, now + 1)];
        // Card 2 has the lowest score but is not due yet
        assert_eq!(next_due_card(&cards, now), Some(1));
    }

    #[test]
    fn test_next_due_ties_keep_deck_order() {
        let cards = vec![card(0, 2, 0), card(1, 1, 0), card(2, 1, 0)];
        assert_eq!(next_due_card(&cards, 10), Some(1));
    }

    #[test]
    fn test_next_due_falls_back_when_nothing_due() {
        let now = 1_000;
        let cards = vec![card(0, 4, now + 5), card(1, 2, now + 9), card(2, 2, now + 1)];
        assert_eq!(next_due_card(&cards, now), Some(1));
    }

    #[test]
    fn test_next_due_empty_deck() {
        assert_eq!(next_due_card(&[], 0), None);
    }

    #[test]
    fn test_due_count() {
        let cards = vec![card(0, 0, 0), card(1, 0, 50), card(2, 0, 10)];
        assert_eq!(due_count(&cards, 10), 2);
    }
}
