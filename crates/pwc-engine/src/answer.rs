//! Parsing of chat-submitted clue references and answers.
//!
//! # Clue References
//!
//! A crossword clue is written as its number followed by a direction
//! letter: `1a`, `17D`, `100d`.
//!
//! # Answers
//!
//! ```text
//! "q and a"        → [Q] [A] [N] [D] [A]
//! "(red)velvet"    → [RED] [V] [E] [L] [V] [E] [T]
//! ". and ."        → [ ] [A] [N] [D] [ ]
//! ```
//!
//! Input is uppercased and all whitespace is dropped, including inside a
//! parenthesized rebus. A `.` outside parentheses is a blank token that
//! clears its cell. Checking the token count against the clue's length is
//! left to the engine.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a crossword clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// Returns the single-letter suffix used in clue references.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::Across => 'a',
            Self::Down => 'd',
        }
    }
}

/// A parsed crossword clue reference such as `17d`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClueRef {
    pub number: u32,
    pub direction: Direction,
}

impl ClueRef {
    #[must_use]
    pub fn new(number: u32, direction: Direction) -> Self {
        Self { number, direction }
    }
}

impl fmt::Display for ClueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.direction.letter())
    }
}

/// Parses a clue reference of the form `<digits><a|d>`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidClue`] for any other shape.
///
/// ```
/// use pwc_engine::{parse_clue_reference, Direction};
///
/// let clue = parse_clue_reference("10a").unwrap();
/// assert_eq!(clue.number, 10);
/// assert_eq!(clue.direction, Direction::Across);
/// assert!(parse_clue_reference("1ad").is_err());
/// ```
pub fn parse_clue_reference(reference: &str) -> Result<ClueRef, EngineError> {
    let invalid = || EngineError::InvalidClue(reference.to_string());

    let mut chars = reference.chars();
    let direction = match chars.next_back() {
        Some('a' | 'A') => Direction::Across,
        Some('d' | 'D') => Direction::Down,
        _ => return Err(invalid()),
    };

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let number = digits.parse().map_err(|_| invalid())?;

    Ok(ClueRef::new(number, direction))
}

/// One cell's worth of a parsed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A letter or rebus string to write into the cell.
    Value(String),
    /// An explicit unknown (`.`); clears the cell.
    Blank,
}

impl Token {
    /// Returns the text written to the cell; blank tokens write `""`.
    #[must_use]
    pub fn as_cell(&self) -> &str {
        match self {
            Self::Value(value) => value,
            Self::Blank => "",
        }
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }
}

/// Splits an answer into cell tokens.
///
/// # Errors
///
/// Returns [`EngineError::InvalidAnswer`] for an empty answer, an empty
/// rebus, nested parentheses, or unbalanced parentheses.
pub fn parse_answer_tokens(answer: &str) -> Result<Vec<Token>, EngineError> {
    let normalized: String = answer
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    if normalized.is_empty() {
        return Err(EngineError::invalid_answer(answer, "empty answer"));
    }

    let mut tokens = Vec::with_capacity(normalized.len());
    let mut rebus: Option<String> = None;

    for c in normalized.chars() {
        match (c, rebus.as_mut()) {
            ('(', Some(_)) => {
                return Err(EngineError::invalid_answer(answer, "nested parentheses"));
            }
            ('(', None) => rebus = Some(String::new()),
            (')', None) => {
                return Err(EngineError::invalid_answer(answer, "unbalanced parentheses"));
            }
            (')', Some(_)) => {
                let value = rebus.take().unwrap_or_default();
                if value.is_empty() {
                    return Err(EngineError::invalid_answer(answer, "empty rebus"));
                }
                tokens.push(Token::Value(value));
            }
            (c, Some(buffer)) => buffer.push(c),
            ('.', None) => tokens.push(Token::Blank),
            (c, None) => tokens.push(Token::Value(c.to_string())),
        }
    }

    if rebus.is_some() {
        return Err(EngineError::invalid_answer(answer, "unbalanced parentheses"));
    }

    Ok(tokens)
}
