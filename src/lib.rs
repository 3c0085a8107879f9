pub mod config;
pub mod database;
pub mod export;
pub mod models;
pub mod state;

pub use models::{Card, Deck, DeckSettings, Flashcard, LearningSession, Question, ReviewState};
pub use state::{AppState, Mode, Transition, View};
