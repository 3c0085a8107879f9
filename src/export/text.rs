//! Plain-text deck import, one `term | definition` pair per line.

use crate::models::Flashcard;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Input area is empty.")]
    EmptyInput,
    #[error("Could not parse any valid cards ({errors} lines ignored). Please check the format.")]
    NoValidCards { errors: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDeck {
    pub flashcards: Vec<Flashcard>,
    /// Non-blank lines that were skipped.
    pub errors: usize,
}

impl ParsedDeck {
    pub fn summary(&self) -> String {
        if self.errors == 0 {
            format!("Loaded {} cards.", self.flashcards.len())
        } else {
            format!(
                "Successfully loaded {} cards, but {} lines were ignored due to formatting errors.",
                self.flashcards.len(),
                self.errors
            )
        }
    }
}

/// Parses deck text. Blank lines are ignored, malformed lines are counted.
pub fn parse_deck_text(input: &str) -> Result<ParsedDeck, ImportError> {
    if input.trim().is_empty() {
        return Err(ImportError::EmptyInput);
    }

    let mut flashcards = Vec::new();
    let mut errors = 0;

    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        match parts.as_slice() {
            [term, definition] => match Flashcard::new(term, definition) {
                Some(card) => flashcards.push(card),
                None => errors += 1,
            },
            _ => errors += 1,
        }
    }

    if flashcards.is_empty() {
        return Err(ImportError::NoValidCards { errors });
    }

    Ok(ParsedDeck { flashcards, errors })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_bad_line() {
        let parsed = parse_deck_text("Dog | Canine\nCat | Feline\nBird|Avian\n\nBadLine").unwrap();

        assert_eq!(parsed.flashcards.len(), 3);
        assert_eq!(parsed.errors, 1);
        assert_eq!(parsed.flashcards[2], Flashcard::new("Bird", "Avian").unwrap());
    }

    #[test]
    fn test_too_many_separators() {
        let parsed = parse_deck_text("a | b | c\nx | y").unwrap();
        assert_eq!(parsed.flashcards.len(), 1);
        assert_eq!(parsed.errors, 1);
    }

    #[test]
    fn test_empty_side_counts_as_error() {
        let parsed = parse_deck_text("a | \n | b\nc | d").unwrap();
        assert_eq!(parsed.flashcards.len(), 1);
        assert_eq!(parsed.errors, 2);
    }

    #[test]
    fn test_windows_line_endings() {
        let parsed = parse_deck_text("a | b\r\nc | d\r\n").unwrap();
        assert_eq!(parsed.flashcards[0].definition, "b");
        assert_eq!(parsed.errors, 0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_deck_text("  \n\n "), Err(ImportError::EmptyInput));
    }

    #[test]
    fn test_no_valid_cards() {
        assert_eq!(
            parse_deck_text("nothing here\nor here"),
            Err(ImportError::NoValidCards { errors: 2 })
        );
    }

    #[test]
    fn test_summary() {
        let parsed = parse_deck_text("a | b\nbad").unwrap();
        assert_eq!(
            parsed.summary(),
            "Successfully loaded 1 cards, but 1 lines were ignored due to formatting errors."
        );
    }
}
