//! Flashcard is a pair <term, definition>. Only text is used in terms and definitions
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

impl Flashcard {
    /// Builds a flashcard from trimmed text. Returns `None` if either side is empty.
    pub fn new(term: &str, definition: &str) -> Option<Self> {
        let term = term.trim();
        let definition = definition.trim();
        if term.is_empty() || definition.is_empty() {
            return None;
        }
        Some(Self {
            term: term.to_string(),
            definition: definition.to_string(),
        })
    }

    /// Key used to match a card with its stored progress.
    pub fn identity(&self) -> String {
        format!("{}|{}", self.term, self.definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flashcard_creation() {
        let card = Flashcard::new("hello", "cześć").unwrap();

        assert_eq!(card.term, "hello");
        assert_eq!(card.definition, "cześć");
    }

    #[test]
    fn test_flashcard_trims_text() {
        let card = Flashcard::new("  Dog ", " Canine\t").unwrap();
        assert_eq!(card.term, "Dog");
        assert_eq!(card.definition, "Canine");
    }

    #[test]
    fn test_flashcard_rejects_empty_sides() {
        assert!(Flashcard::new("", "x").is_none());
        assert!(Flashcard::new("x", "   ").is_none());
    }

    #[test]
    fn test_identity() {
        let card = Flashcard::new("Cat", "Feline").unwrap();
        assert_eq!(card.identity(), "Cat|Feline");
    }
}
