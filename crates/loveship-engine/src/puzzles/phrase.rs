use std::collections::BTreeSet;

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics and lower-case a single character.
/// Returns `None` for anything that is not a letter.
pub fn normalize_letter(c: char) -> Option<char> {
    if !c.is_alphabetic() {
        return None;
    }
    c.nfd()
        .filter(|m| !is_combining_mark(*m))
        .flat_map(char::to_lowercase)
        .next()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Not a letter, already classified, or the phrase is already complete.
    Ignored,
    Hit { complete: bool },
    Miss { lives: u8 },
    /// The miss used the last life; progress was wiped and lives restored.
    Reset,
}

/// One displayed character of the phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "char", rename_all = "snake_case")]
pub enum PhraseCell {
    Hidden,
    Revealed(char),
    Apostrophe,
}

/// Riddle 2b: reveal a hidden phrase letter by letter on a lives budget.
///
/// Running out of lives is not terminal: both letter sets are cleared and
/// lives are restored, so the puzzle can be retried indefinitely.
#[derive(Debug, Clone)]
pub struct PhraseReveal {
    phrase: String,
    required: BTreeSet<char>,
    guessed: BTreeSet<char>,
    wrong: BTreeSet<char>,
    lives: u8,
    max_lives: u8,
    complete: bool,
}

impl PhraseReveal {
    pub fn new(phrase: &str, lives: u8) -> Self {
        let required = phrase.chars().filter_map(normalize_letter).collect();
        Self {
            phrase: phrase.to_string(),
            required,
            guessed: BTreeSet::new(),
            wrong: BTreeSet::new(),
            lives,
            max_lives: lives,
            complete: false,
        }
    }

    pub fn guess(&mut self, letter: char) -> GuessOutcome {
        let Some(letter) = normalize_letter(letter) else {
            return GuessOutcome::Ignored;
        };
        if self.complete || self.guessed.contains(&letter) || self.wrong.contains(&letter) {
            return GuessOutcome::Ignored;
        }

        if self.required.contains(&letter) {
            self.guessed.insert(letter);
            self.complete = self.required.is_subset(&self.guessed);
            return GuessOutcome::Hit { complete: self.complete };
        }

        self.wrong.insert(letter);
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.guessed.clear();
            self.wrong.clear();
            self.lives = self.max_lives;
            return GuessOutcome::Reset;
        }
        GuessOutcome::Miss { lives: self.lives }
    }

    /// The phrase split into words of display cells.
    pub fn cells(&self) -> Vec<Vec<PhraseCell>> {
        self.phrase
            .split(' ')
            .map(|word| word.chars().map(|c| self.cell(c)).collect())
            .collect()
    }

    fn cell(&self, c: char) -> PhraseCell {
        if c == '\'' {
            return PhraseCell::Apostrophe;
        }
        match normalize_letter(c) {
            Some(n) if !self.complete && !self.guessed.contains(&n) => PhraseCell::Hidden,
            _ => PhraseCell::Revealed(c.to_uppercase().next().unwrap_or(c)),
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn required(&self) -> &BTreeSet<char> {
        &self.required
    }

    pub fn guessed(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    pub fn wrong(&self) -> &BTreeSet<char> {
        &self.wrong
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn max_lives(&self) -> u8 {
        self.max_lives
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}
