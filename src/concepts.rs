// src/concepts.rs
//! Lexical concept extraction.
//!
//! A "concept" here is nothing semantic: it is a lowercase ASCII word token
//! longer than two characters. Only the first [`MAX_CONCEPTS`] survivors are
//! kept, in source order, duplicates included.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Upper bound on concepts taken from a single text.
pub const MAX_CONCEPTS: usize = 10;

/// Tokens must be strictly longer than this to count as a concept.
pub const MIN_CONCEPT_LEN: usize = 2;

/// Ordered, possibly repeating sequence of concept tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptSet(Vec<String>);

impl ConceptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact string membership (tokens are already lowercase).
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Comma-joined form used by the rationale templates.
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl Deref for ConceptSet {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for ConceptSet {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl<S: Into<String>> FromIterator<S> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ConceptSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// ASCII word character: `[A-Za-z0-9_]`.
#[inline]
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase, then split on anything that is not a word character.
///
/// Punctuation is turned into a separator and whitespace already is one, so
/// every maximal run of word characters becomes a token.
fn word_tokens(lowered: &str) -> impl Iterator<Item = &str> + '_ {
    lowered.split(|c: char| !is_word_char(c)).filter(|t| !t.is_empty())
}

/// Extract the concept sequence of `text`. Total: empty input gives an empty set.
pub fn extract(text: &str) -> ConceptSet {
    let lowered = text.to_lowercase();
    word_tokens(&lowered)
        // word tokens are pure ASCII, so byte length == char length
        .filter(|t| t.len() > MIN_CONCEPT_LEN)
        .take(MAX_CONCEPTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_and_blank_inputs_give_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t ").is_empty());
        assert!(extract("?! ... ,,").is_empty());
    }

    #[test]
    fn short_words_are_dropped() {
        let c = extract("The Eiffel Tower is in Paris");
        assert_eq!(c.into_vec(), v(&["the", "eiffel", "tower", "paris"]));
    }

    #[test]
    fn punctuation_splits_words() {
        let c = extract("state-of-the-art, well_known e.g. co-op");
        assert_eq!(c.into_vec(), v(&["state", "the", "art", "well_known"]));
    }

    #[test]
    fn duplicates_and_order_preserved() {
        let c = extract("Paris paris PARIS rome Paris");
        assert_eq!(c.into_vec(), v(&["paris", "paris", "paris", "rome", "paris"]));
    }

    #[test]
    fn truncates_to_first_ten() {
        let text = (0..25).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        let c = extract(&text);
        assert_eq!(c.len(), MAX_CONCEPTS);
        assert_eq!(c[0], "word0");
        assert_eq!(c[9], "word9");
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        // 'é' is not an ASCII word char, so "café" leaves "caf".
        let c = extract("Café Zürich naïve");
        assert_eq!(c.into_vec(), v(&["caf", "rich"]));
    }

    #[test]
    fn digits_and_underscores_are_word_chars() {
        let c = extract("gpt_4 2024 is v10");
        assert_eq!(c.into_vec(), v(&["gpt_4", "2024", "v10"]));
    }

    #[test]
    fn membership_is_exact() {
        let c = extract("Eiffel tower");
        assert!(c.contains("eiffel"));
        assert!(!c.contains("Eiffel"));
        assert!(!c.contains("eiff"));
        assert_eq!(c.joined(), "eiffel, tower");
    }
}
