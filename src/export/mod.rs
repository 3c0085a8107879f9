pub mod share;
pub mod text;

pub use share::{ShareError, SharedDeck};
pub use text::{ImportError, ParsedDeck};
