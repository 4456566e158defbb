//! Spelling-bee puzzle model, letter inference and scoring.

use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Minimum length of an answer.
pub const MIN_WORD_LEN: usize = 4;

/// Bonus for a word that uses all seven letters.
pub const PANGRAM_BONUS: u32 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Puzzle {
    pub center_letter: char,
    /// The six non-center letters.
    pub letters: Vec<char>,
    pub official_answers: Vec<String>,
    pub unofficial_answers: Vec<String>,
    pub published_date: Option<NaiveDate>,
}

impl Puzzle {
    /// Builds a puzzle from its answer lists, inferring the letters.
    ///
    /// Words are uppercased and trimmed first.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPuzzle`] if there are no official words, no
    /// unofficial words while `unofficial_required`, a word shorter than
    /// four letters, or the letters cannot be inferred.
    pub fn infer(
        official: &[String],
        unofficial: &[String],
        unofficial_required: bool,
    ) -> Result<Self, EngineError> {
        if official.is_empty() {
            return Err(EngineError::InvalidPuzzle("no official words".into()));
        }
        if unofficial_required && unofficial.is_empty() {
            return Err(EngineError::InvalidPuzzle("no unofficial words".into()));
        }

        let normalize = |words: &[String]| -> Result<Vec<String>, EngineError> {
            words
                .iter()
                .map(|word| {
                    let word = word.trim().to_uppercase();
                    if word.chars().count() < MIN_WORD_LEN {
                        return Err(EngineError::InvalidPuzzle(format!("word too short: {word}")));
                    }
                    Ok(word)
                })
                .collect()
        };
        let official = normalize(official)?;
        let unofficial = normalize(unofficial)?;

        let (center_letter, letters) = infer_letters(official.iter().chain(&unofficial))?;
        Ok(Self {
            center_letter,
            letters,
            official_answers: official,
            unofficial_answers: unofficial,
            published_date: None,
        })
    }

    /// Returns the accepted answers, sorted.
    #[must_use]
    pub fn allowed_answers(&self, allow_unofficial: bool) -> Vec<&str> {
        let mut words: Vec<&str> = self.official_answers.iter().map(String::as_str).collect();
        if allow_unofficial {
            words.extend(self.unofficial_answers.iter().map(String::as_str));
        }
        words.sort_unstable();
        words.dedup();
        words
    }

    #[must_use]
    pub fn is_official(&self, word: &str) -> bool {
        self.official_answers.iter().any(|w| w == word)
    }

    #[must_use]
    pub fn is_unofficial(&self, word: &str) -> bool {
        self.unofficial_answers.iter().any(|w| w == word)
    }

    /// Returns `true` if `word` uses every letter of the puzzle.
    #[must_use]
    pub fn is_pangram(&self, word: &str) -> bool {
        word.contains(self.center_letter) && self.letters.iter().all(|&c| word.contains(c))
    }

    /// Points for `word`: 1 for a four-letter word, otherwise its length,
    /// plus [`PANGRAM_BONUS`] for a pangram.
    #[must_use]
    pub fn score(&self, word: &str) -> u32 {
        let len = u32::try_from(word.chars().count()).unwrap_or(u32::MAX);
        let base = if len <= 4 { 1 } else { len };
        if self.is_pangram(word) {
            base + PANGRAM_BONUS
        } else {
            base
        }
    }

    /// Sum of the scores of every accepted answer.
    #[must_use]
    pub fn max_score(&self, allow_unofficial: bool) -> u32 {
        self.allowed_answers(allow_unofficial)
            .into_iter()
            .map(|w| self.score(w))
            .sum()
    }

    /// Returns a copy without either answer list.
    #[must_use]
    pub fn without_solution(&self) -> Self {
        Self {
            official_answers: Vec::new(),
            unofficial_answers: Vec::new(),
            ..self.clone()
        }
    }
}

/// Infers the center letter and the six other letters from a word list.
///
/// The center letter is the one that appears in every word; if several do,
/// the alphabetically first wins. The remaining letters are returned
/// sorted.
///
/// # Errors
///
/// [`EngineError::InvalidPuzzle`] if no letter appears in every word or
/// the remaining letters do not number exactly six.
pub fn infer_letters<'a, I>(words: I) -> Result<(char, Vec<char>), EngineError>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut word_count = 0;
    let mut frequencies: BTreeMap<char, usize> = BTreeMap::new();
    for word in words {
        word_count += 1;
        for letter in word.chars().collect::<BTreeSet<_>>() {
            *frequencies.entry(letter).or_default() += 1;
        }
    }

    let center = frequencies
        .iter()
        .find(|&(_, &count)| count == word_count)
        .map(|(&letter, _)| letter)
        .ok_or_else(|| EngineError::InvalidPuzzle("unable to determine center letter".into()))?;

    let letters: Vec<char> = frequencies.into_keys().filter(|&c| c != center).collect();
    if letters.len() != 6 {
        return Err(EngineError::InvalidPuzzle(format!(
            "expected 6 non-center letters, found {letters:?}"
        )));
    }
    Ok((center, letters))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const OFFICIAL: &[&str] = &[
        "COCONUT", "CONCOCT", "CONTORT", "CONTOUR", "COOT", "COTTON", "COTTONY", "COUNT",
        "COUNTRY", "COUNTY", "COURT", "CROUTON", "CURT", "CUTOUT", "NUTTY", "ONTO", "OUTCRY",
        "OUTRO", "OUTRUN", "ROOT", "ROTO", "ROTOR", "ROUT", "RUNOUT", "RUNT", "RUNTY", "RUTTY",
        "TONY", "TOON", "TOOT", "TORN", "TORO", "TORT", "TOUR", "TOUT", "TROT", "TROUT", "TROY",
        "TRYOUT", "TURN", "TURNOUT", "TUTOR", "TUTU", "TYCOON", "TYRO", "UNCUT", "UNTO", "YURT",
    ];

    pub(crate) const UNOFFICIAL: &[&str] = &[
        "CONCOCTOR", "CONTO", "CORNUTO", "CROTON", "CRYOTRON", "CUNT", "CUTTY", "CYTON",
        "NOCTURN", "NONCOUNT", "NONCOUNTRY", "NONCOUNTY", "NOTTURNO", "OCTOROON", "OTTO",
        "OUTCOUNT", "OUTROOT", "OUTTROT", "OUTTURN", "ROOTY", "RYOT", "TOCO", "TORC", "TOROT",
        "TORR", "TORY", "TOTTY", "TOUTON", "TOYO", "TOYON", "TROU", "TROUTY", "TUNNY", "TURNON",
        "TURR", "TUTTY", "UNROOT", "UNTORN",
    ];

    pub(crate) fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    pub(crate) fn nytbee() -> Puzzle {
        Puzzle::infer(&words(OFFICIAL), &words(UNOFFICIAL), true).unwrap()
    }

    #[test]
    fn infers_letters() {
        let puzzle = nytbee();
        assert_eq!(puzzle.center_letter, 'T');
        assert_eq!(puzzle.letters, vec!['C', 'N', 'O', 'R', 'U', 'Y']);
        assert_eq!(puzzle.official_answers.len(), 48);
        assert_eq!(puzzle.unofficial_answers.len(), 38);
    }

    #[test]
    fn infer_normalizes_case() {
        let official = words(&["coconut", " countRY "]);
        let puzzle = Puzzle::infer(&official, &[], false).unwrap();
        assert_eq!(puzzle.official_answers, vec!["COCONUT", "COUNTRY"]);
    }

    #[test]
    fn infer_errors() {
        let official = words(OFFICIAL);
        let unofficial = words(UNOFFICIAL);
        let with = |list: &[String], extra: &str| {
            let mut list = list.to_vec();
            list.push(extra.to_string());
            list
        };

        let cases: Vec<(&str, Vec<String>, Vec<String>)> = vec![
            ("no official words", vec![], unofficial.clone()),
            ("no unofficial words", official.clone(), vec![]),
            ("official too short", with(&official, "RUT"), unofficial.clone()),
            ("unofficial too short", official.clone(), with(&unofficial, "RUT")),
            ("multiple center options", words(&["COCONUT"]), words(&["COCONUT"])),
            ("no center", words(&["ABCDE", "FGHIJ"]), words(&["ABCDE", "FGHIJ"])),
            (
                "too many letters",
                words(&["ABCD", "AFGH", "AIJK"]),
                words(&["ABCD", "AFGH", "AIJK"]),
            ),
        ];
        for (name, official, unofficial) in cases {
            let result = Puzzle::infer(&official, &unofficial, true);
            assert!(
                matches!(result, Err(EngineError::InvalidPuzzle(_))),
                "{name}: {result:?}"
            );
        }
    }

    #[test]
    fn unofficial_optional_when_not_required() {
        let puzzle = Puzzle::infer(&words(OFFICIAL), &[], false).unwrap();
        assert!(puzzle.unofficial_answers.is_empty());
    }

    #[test]
    fn center_tie_breaks_alphabetically() {
        // Both B and C appear in every word.
        let list = words(&["ABCD", "BCEF", "BCGA"]);
        let (center, letters) = infer_letters(&list).unwrap();
        assert_eq!(center, 'B');
        assert_eq!(letters, vec!['A', 'C', 'D', 'E', 'F', 'G']);
    }

    #[test]
    fn scoring() {
        let puzzle = nytbee();
        assert_eq!(puzzle.score("COOT"), 1);
        assert_eq!(puzzle.score("COUNT"), 5);
        assert_eq!(puzzle.score("COCONUT"), 7);
        assert!(puzzle.is_pangram("COUNTRY"));
        assert_eq!(puzzle.score("COUNTRY"), 14);
        assert_eq!(puzzle.max_score(false), 183);
        assert!(puzzle.max_score(true) > 183);
    }

    #[test]
    fn allowed_answers_sorted() {
        let puzzle = nytbee();
        let official = puzzle.allowed_answers(false);
        assert_eq!(official.len(), 48);
        assert_eq!(&official[..3], &["COCONUT", "CONCOCT", "CONTORT"]);

        let all = puzzle.allowed_answers(true);
        assert_eq!(&all[..5], &["COCONUT", "CONCOCT", "CONCOCTOR", "CONTO", "CONTORT"]);
    }

    #[test]
    fn without_solution_keeps_letters() {
        let viewer = nytbee().without_solution();
        assert!(viewer.official_answers.is_empty());
        assert!(viewer.unofficial_answers.is_empty());
        assert_eq!(viewer.center_letter, 'T');
        assert_eq!(viewer.letters.len(), 6);
    }
}
