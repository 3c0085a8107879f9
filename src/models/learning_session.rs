//! Learn session queue.
//!
//! Every card in the deck is queued once in random order. A correct answer
//! drops the front card for the rest of the session, a wrong one sends it to
//! the back so it comes round again. Long-term progress is tracked separately
//! by the scheduler.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;

/// Counts shown when a session completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub cards: usize,
    pub answers: usize,
    pub misses: usize,
}

/// Queue of card indices into the deck that still need a correct answer.
#[derive(Clone, Debug)]
pub struct LearningSession {
    queue: VecDeque<usize>,
    summary: SessionSummary,
}

impl LearningSession {
    /// Queues every card of a deck with `card_count` cards, shuffled.
    pub fn new<R: Rng + ?Sized>(card_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..card_count).collect();
        // Fisher-Yates, from the last index down to 1
        order.shuffle(rng);

        Self {
            queue: order.into(),
            summary: SessionSummary {
                cards: card_count,
                ..SessionSummary::default()
            },
        }
    }

    /// Deck index of the card being asked.
    pub fn current(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    /// Records an answer to the current card and advances the queue.
    pub fn answer(&mut self, correct: bool) {
        let Some(front) = self.queue.pop_front() else {
            return;
        };

        self.summary.answers += 1;
        if !correct {
            self.summary.misses += 1;
            self.queue.push_back(front);
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn mastered(&self) -> usize {
        self.summary.cards - self.queue.len()
    }

    pub fn is_completed(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn progress_message(&self) -> String {
        format!(
            "{} / {} mastered ({} remaining)",
            self.mastered(),
            self.summary.cards,
            self.remaining()
        )
    }
}
