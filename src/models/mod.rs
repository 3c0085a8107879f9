pub mod card;
pub mod deck;
pub mod flashcard;
pub mod learning_session;
pub mod quiz;
pub mod review_state;
pub mod scheduler;

pub use card::{Card, CardId};
pub use deck::{Deck, DeckSettings};
pub use flashcard::Flashcard;
pub use learning_session::{LearningSession, SessionSummary};
pub use quiz::Question;
pub use review_state::{Millis, ReviewState};
pub use scheduler::Schedule;
