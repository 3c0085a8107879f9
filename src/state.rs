//! Application state and the updates driven by user events.
//!
//! The UI never changes state directly. Each event maps to one method here,
//! which returns a [`Transition`]. A deferred transition tells the UI how long
//! to wait before calling [`AppState::resume`]; pacing is never measured here.
//! Every follow-up carries the generation it was issued in, and changing mode
//! starts a new generation, so late follow-ups from an abandoned transition do
//! nothing.

use crate::config::{Config, DisplayConfig, LearnConfig};
use crate::database::ledger::{clear_progress, load_progress, save_progress};
use crate::database::theme::{load_theme, save_theme};
use crate::database::{StorageError, Theme};
use crate::export::share::{decode_fragment, encode_deck, fragment_of, share_url};
use crate::export::text::{ImportError, parse_deck_text};
use crate::models::scheduler::{due_count, next_due_card};
use crate::models::{
    Deck, DeckSettings, Flashcard, LearningSession, Millis, Question, ReviewState, Schedule,
    SessionSummary,
};
use rand::rngs::StdRng;
use rusqlite::Connection;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Create,
    Flashcards,
    Learn,
    Review,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    ShowCard(usize),
    Release,
    NextQuestion,
}

/// Work the UI must hand back through [`AppState::resume`] once the delay passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FollowUp {
    generation: u64,
    action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Immediate,
    Deferred { delay: Duration, follow_up: FollowUp },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub chosen: String,
    pub answer: String,
}

impl Feedback {
    pub fn message(&self) -> String {
        if self.correct {
            "Correct!".to_string()
        } else {
            format!("Incorrect. The correct answer is: {}", self.answer)
        }
    }
}

/// What the UI should draw for the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum View<'a> {
    Create,
    Empty,
    Flashcard {
        front: &'a str,
        back: &'a str,
        flipped: bool,
        review: &'a ReviewState,
        position: usize,
        total: usize,
    },
    LearnDisabled {
        cards: usize,
        needed: usize,
    },
    Question {
        question: &'a Question,
        feedback: Option<&'a Feedback>,
        progress: Option<String>,
    },
    SessionComplete(SessionSummary),
}

pub struct AppState {
    conn: Connection,
    rng: StdRng,
    schedule: Schedule,
    learn: LearnConfig,
    display: DisplayConfig,

    deck: Deck,
    mode: Mode,
    theme: Theme,

    card_index: usize,
    flipped: bool,

    session: Option<LearningSession>,
    question: Option<Question>,
    feedback: Option<Feedback>,

    busy: bool,
    generation: u64,
    notice: Option<String>,
    notice_serial: u64,
}

impl AppState {
    /// Creates the state with an empty deck, restoring the theme preference.
    pub fn new(config: &Config, conn: Connection, rng: StdRng) -> Self {
        let theme = load_theme(&conn);
        Self {
            conn,
            rng,
            schedule: config.schedule.to_schedule(),
            learn: config.learn.clone(),
            display: config.display.clone(),
            deck: Deck::default(),
            mode: Mode::Create,
            theme,
            card_index: 0,
            flipped: false,
            session: None,
            question: None,
            feedback: None,
            busy: false,
            generation: 0,
            notice: None,
            notice_serial: 0,
        }
    }

    /// Loads the deck carried by a share link. A bad link leaves an empty deck.
    pub fn open_link(&mut self, link: &str, now: Millis) {
        let fragment = fragment_of(link);
        if fragment.is_empty() {
            self.replace_deck(Vec::new(), DeckSettings::default(), now);
            return;
        }

        match decode_fragment(fragment) {
            Ok(shared) => {
                let loaded = shared.flashcards.len();
                self.replace_deck(shared.flashcards, shared.settings, now);
                if shared.skipped > 0 {
                    warn!("Share link had {} cards with an empty side", shared.skipped);
                    self.set_notice(format!(
                        "Loaded {loaded} cards, {} entries in the link were ignored.",
                        shared.skipped
                    ));
                }
            }
            Err(e) => {
                warn!("Error parsing deck from link: {e}");
                self.replace_deck(Vec::new(), DeckSettings::default(), now);
                self.set_notice("The share link is invalid, starting with an empty deck.");
            }
        }
    }

    /// Replaces the deck with cards parsed from `term | definition` lines.
    pub fn import_text(&mut self, input: &str, now: Millis) -> Result<(), ImportError> {
        let parsed = parse_deck_text(input)?;
        info!(
            "Imported {} cards ({} lines ignored)",
            parsed.flashcards.len(),
            parsed.errors
        );
        let summary = (parsed.errors > 0).then(|| parsed.summary());
        let settings = self.deck.settings;
        self.replace_deck(parsed.flashcards, settings, now);
        if let Some(summary) = summary {
            self.set_notice(summary);
        }
        Ok(())
    }

    fn replace_deck(&mut self, flashcards: Vec<Flashcard>, settings: DeckSettings, now: Millis) {
        let progress = load_progress(&self.conn);
        self.deck = Deck::build(flashcards, settings, &progress, &mut self.rng);
        self.card_index = 0;
        info!("Deck loaded with {} cards", self.deck.len());

        let mode = if self.deck.is_empty() {
            Mode::Create
        } else {
            Mode::Flashcards
        };
        self.set_mode(mode, now);
    }

    /// Share link for the current deck, or `None` (with a notice) if there is nothing to share.
    pub fn share_link(&mut self) -> Option<String> {
        if self.deck.is_empty() {
            self.set_notice("Cannot share an empty deck!");
            return None;
        }
        match encode_deck(&self.deck.flashcards(), self.deck.settings) {
            Ok(fragment) => Some(share_url(&self.display.share_base_url, &fragment)),
            Err(e) => {
                warn!("Error generating share link: {e}");
                self.set_notice("Error generating share link.");
                None
            }
        }
    }

    pub fn set_settings(&mut self, settings: DeckSettings) {
        self.deck.settings = settings;
    }

    /// Switches mode, abandoning any transition in progress.
    pub fn set_mode(&mut self, mode: Mode, now: Millis) -> Transition {
        self.generation += 1;
        self.busy = false;
        self.feedback = None;
        self.question = None;
        self.mode = mode;

        match mode {
            Mode::Create => {}
            Mode::Flashcards => {
                self.flipped = false;
                if self.card_index >= self.deck.len() {
                    self.card_index = 0;
                }
            }
            Mode::Learn => {
                self.session = None;
                if self.learn_available() {
                    self.start_session(now);
                }
            }
            Mode::Review => {
                if self.learn_available() {
                    self.next_question(now);
                }
            }
        }
        Transition::Immediate
    }

    /// Whether the deck is large enough for multiple-choice questions.
    pub fn learn_available(&self) -> bool {
        self.deck.len() >= self.learn.min_cards.max(1)
    }

    /// Starts a fresh learn session over the whole deck.
    pub fn restart_session(&mut self, now: Millis) -> Transition {
        self.set_mode(Mode::Learn, now)
    }

    fn start_session(&mut self, now: Millis) {
        let session = LearningSession::new(self.deck.len(), &mut self.rng);
        debug!("Learn session started with {} cards", session.remaining());
        self.session = Some(session);
        self.next_question(now);
    }

    fn next_question(&mut self, now: Millis) {
        self.feedback = None;
        let index = match self.mode {
            Mode::Learn => self.session.as_ref().and_then(LearningSession::current),
            Mode::Review => next_due_card(&self.deck.cards, now),
            Mode::Create | Mode::Flashcards => None,
        };
        self.question = match index {
            Some(i) => Question::new(&self.deck.cards, i, self.learn.option_count, &mut self.rng),
            None => None,
        };
        if self.mode == Mode::Learn && self.question.is_none() {
            if let Some(session) = &self.session {
                info!("Learn session complete: {:?}", session.summary());
            }
        }
    }

    pub fn flip(&mut self) {
        if self.busy || self.mode != Mode::Flashcards || self.deck.is_empty() {
            return;
        }
        self.flipped = !self.flipped;
    }

    pub fn next_card(&mut self) -> Transition {
        self.step_card(1)
    }

    pub fn prev_card(&mut self) -> Transition {
        self.step_card(-1)
    }

    fn step_card(&mut self, step: isize) -> Transition {
        if self.busy || self.mode != Mode::Flashcards || self.deck.is_empty() {
            return Transition::Immediate;
        }
        let len = self.deck.len() as isize;
        let target = (self.card_index as isize + step).rem_euclid(len) as usize;
        self.busy = true;
        self.defer(self.display.fade(), Action::ShowCard(target))
    }

    /// Grades `choice` against the current question.
    ///
    /// Card progress, the session queue and stored progress are all updated
    /// before this returns; the next question follows after the feedback delay.
    pub fn answer(&mut self, choice: &str, now: Millis) -> Transition {
        if self.busy || self.feedback.is_some() {
            return Transition::Immediate;
        }
        let Some(question) = &self.question else {
            return Transition::Immediate;
        };
        let correct = question.is_correct(choice);
        let index = question.card_index;
        let answer = question.answer.clone();

        if let Some(card) = self.deck.cards.get_mut(index) {
            self.schedule.answer(card, correct, now);
            debug!(
                "Answered '{}' {}, score now {}",
                card.term(),
                if correct { "correctly" } else { "incorrectly" },
                card.review.score
            );
        }
        if self.mode == Mode::Learn {
            if let Some(session) = &mut self.session {
                session.answer(correct);
            }
        }
        self.persist();

        self.feedback = Some(Feedback {
            correct,
            chosen: choice.to_string(),
            answer,
        });
        self.busy = true;
        self.defer(self.learn.feedback_delay(), Action::NextQuestion)
    }

    /// Completes a deferred transition. Follow-ups from an earlier mode are ignored.
    pub fn resume(&mut self, follow_up: FollowUp, now: Millis) -> Transition {
        if follow_up.generation != self.generation {
            debug!("Ignoring stale follow-up {:?}", follow_up.action);
            return Transition::Immediate;
        }

        match follow_up.action {
            Action::ShowCard(index) => {
                self.card_index = index;
                self.flipped = false;
                self.defer(self.display.fade(), Action::Release)
            }
            Action::Release => {
                self.busy = false;
                Transition::Immediate
            }
            Action::NextQuestion => {
                self.busy = false;
                self.next_question(now);
                Transition::Immediate
            }
        }
    }

    fn defer(&self, delay: Duration, action: Action) -> Transition {
        Transition::Deferred {
            delay,
            follow_up: FollowUp {
                generation: self.generation,
                action,
            },
        }
    }

    fn persist(&mut self) {
        if let Err(e) = save_progress(&self.deck.cards, &self.conn) {
            self.storage_warning("Progress could not be saved", e);
        }
    }

    fn storage_warning(&mut self, what: &str, e: StorageError) {
        warn!("{what}: {e}");
        self.set_notice(format!("{what}; it is kept for this session only."));
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = save_theme(self.theme, &self.conn) {
            self.storage_warning("Theme preference could not be saved", e);
        }
    }

    /// Forgets all review progress, in memory and in the store.
    pub fn reset_progress(&mut self, now: Millis) {
        self.deck.reset_progress();
        if let Err(e) = clear_progress(&self.conn) {
            self.storage_warning("Stored progress could not be cleared", e);
        }
        info!("Review progress reset");
        self.set_mode(self.mode, now);
    }

    pub fn view(&self) -> View<'_> {
        if self.mode == Mode::Create {
            return View::Create;
        }
        if self.deck.is_empty() {
            return View::Empty;
        }

        match self.mode {
            Mode::Create => View::Create,
            Mode::Flashcards => {
                let card = &self.deck.cards[self.card_index.min(self.deck.len() - 1)];
                let (front, back) = if self.deck.settings.start_side_is_term {
                    (card.term(), card.definition())
                } else {
                    (card.definition(), card.term())
                };
                View::Flashcard {
                    front,
                    back,
                    flipped: self.flipped,
                    review: &card.review,
                    position: self.card_index + 1,
                    total: self.deck.len(),
                }
            }
            Mode::Learn | Mode::Review if !self.learn_available() => View::LearnDisabled {
                cards: self.deck.len(),
                needed: self.learn.min_cards,
            },
            Mode::Learn | Mode::Review => match (&self.question, &self.session) {
                (Some(question), session) => View::Question {
                    question,
                    feedback: self.feedback.as_ref(),
                    progress: match self.mode {
                        Mode::Learn => session.as_ref().map(LearningSession::progress_message),
                        _ => None,
                    },
                },
                (None, Some(session)) if self.mode == Mode::Learn => {
                    View::SessionComplete(session.summary())
                }
                (None, _) => View::Empty,
            },
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn due_count(&self, now: Millis) -> usize {
        due_count(&self.deck.cards, now)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Changes every time a notice is set, even to the same text.
    pub fn notice_serial(&self) -> u64 {
        self.notice_serial
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
        self.notice_serial += 1;
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
