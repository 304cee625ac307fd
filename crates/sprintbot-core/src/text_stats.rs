//! Word, character and letter counts for a piece of writing.

use crate::numeral::format_count;

const WORDS: [&str; 3] = ["слово", "слова", "слів"];
const CHARACTERS: [&str; 3] = ["символ", "символа", "символів"];
const LETTERS: [&str; 3] = ["літера", "літери", "літер"];

/// Counts reported by the word-count command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    /// Whitespace-separated tokens that contain something besides punctuation.
    pub words: u64,
    /// Unicode scalar values, whitespace included.
    pub characters: u64,
    /// Characters that are not ASCII whitespace, ASCII punctuation or ASCII
    /// digits. Other Unicode spaces, such as NBSP, count as letters.
    pub letters: u64,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let words = text
            .split_whitespace()
            .filter(|word| !word.trim_matches(|c: char| c.is_ascii_punctuation()).is_empty())
            .count() as u64;
        let characters = text.chars().count() as u64;
        let letters = text
            .chars()
            .filter(|c| !(c.is_ascii_whitespace() || c.is_ascii_punctuation() || c.is_ascii_digit()))
            .count() as u64;
        Self {
            words,
            characters,
            letters,
        }
    }

    /// One pluralized line per count.
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}",
            format_count(self.words, WORDS),
            format_count(self.characters, CHARACTERS),
            format_count(self.letters, LETTERS)
        )
    }
}
