//! Line-oriented command scripts.
//!
//! ```text
//! # comment
//! select puzzle.json
//! toggle
//! answer 1a Q AND A
//! word coconut
//! show 1a
//! setting only_allow_correct_answers true
//! shuffle
//! ```

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(PathBuf),
    Toggle,
    Answer { clue: String, answer: String },
    Word(String),
    Show(String),
    Setting { name: String, value: Value },
    Shuffle,
}

impl Command {
    /// Script keyword, for messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Toggle => "toggle",
            Self::Answer { .. } => "answer",
            Self::Word(_) => "word",
            Self::Show(_) => "show",
            Self::Setting { .. } => "setting",
            Self::Shuffle => "shuffle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("{command}: missing {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("{0}: takes no arguments")]
    UnexpectedArgument(&'static str),
}

/// Parses one line. Blank lines and `#` comments yield `None`.
///
/// A setting value that is not valid JSON is taken as a string, so
/// `setting clues_to_show across` works without quotes.
///
/// # Errors
///
/// [`ParseError`] for an unknown keyword or a missing argument.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = split_word(line);
    let command = match keyword {
        "select" => Command::Select(PathBuf::from(required("select", "puzzle file", rest)?)),
        "toggle" => no_args("toggle", rest, Command::Toggle)?,
        "shuffle" => no_args("shuffle", rest, Command::Shuffle)?,
        "answer" => {
            let (clue, answer) = split_word(rest);
            let clue = required("answer", "clue", clue)?;
            let answer = required("answer", "answer", answer)?;
            Command::Answer {
                clue: clue.to_string(),
                answer: answer.to_string(),
            }
        }
        "word" => Command::Word(required("word", "word", rest)?.to_string()),
        "show" => Command::Show(required("show", "clue", rest)?.to_string()),
        "setting" => {
            let (name, raw) = split_word(rest);
            let name = required("setting", "name", name)?;
            let raw = required("setting", "value", raw)?;
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            Command::Setting {
                name: name.to_string(),
                value,
            }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn required<'a>(
    command: &'static str,
    what: &'static str,
    value: &'a str,
) -> Result<&'a str, ParseError> {
    if value.is_empty() {
        Err(ParseError::MissingArgument { command, what })
    } else {
        Ok(value)
    }
}

fn no_args(command: &'static str, rest: &str, parsed: Command) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseError::UnexpectedArgument(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(line: &str) -> Command {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# select x.json").unwrap(), None);
    }

    #[test]
    fn answer_keeps_spaces_and_rebus() {
        assert_eq!(
            parse("answer 1a  Q (AND) A "),
            Command::Answer {
                clue: "1a".into(),
                answer: "Q (AND) A".into()
            }
        );
    }

    #[test]
    fn setting_values() {
        assert_eq!(
            parse("setting only_allow_correct_answers true"),
            Command::Setting {
                name: "only_allow_correct_answers".into(),
                value: json!(true)
            }
        );
        assert_eq!(
            parse("setting clues_to_show across"),
            Command::Setting {
                name: "clues_to_show".into(),
                value: json!("across")
            }
        );
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse("toggle"), Command::Toggle);
        assert_eq!(parse("  shuffle  "), Command::Shuffle);
        assert_eq!(parse("word coconut"), Command::Word("coconut".into()));
        assert_eq!(parse("show 12D"), Command::Show("12D".into()));
        assert_eq!(
            parse("select puzzles/today.json"),
            Command::Select(PathBuf::from("puzzles/today.json"))
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse_line("solve 1a").unwrap_err(),
            ParseError::UnknownCommand("solve".into())
        );
        assert_eq!(
            parse_line("answer 1a").unwrap_err(),
            ParseError::MissingArgument {
                command: "answer",
                what: "answer"
            }
        );
        assert_eq!(
            parse_line("setting show_notes").unwrap_err(),
            ParseError::MissingArgument {
                command: "setting",
                what: "value"
            }
        );
        assert_eq!(
            parse_line("toggle now").unwrap_err(),
            ParseError::UnexpectedArgument("toggle")
        );
    }
}
