use crate::evaluator::SecretWord;
use std::collections::BTreeSet;

/// Letters of the secret word the player has asked to see.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LetterHints {
    word_length: usize,
    revealed: BTreeSet<usize>,
}

impl LetterHints {
    #[must_use]
    pub fn new(word_length: usize) -> Self {
        Self {
            word_length,
            revealed: BTreeSet::new(),
        }
    }

    /// Reveal the letter at `index`. Returns false if it is out of range.
    pub fn reveal(&mut self, index: usize) -> bool {
        if index >= self.word_length {
            return false;
        }
        self.revealed.insert(index);
        true
    }

    /// Reveal the lowest hidden index, if any is left.
    pub fn reveal_next(&mut self) -> Option<usize> {
        let next = (0..self.word_length).find(|i| !self.revealed.contains(i))?;
        self.revealed.insert(next);
        Some(next)
    }

    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Revealed letters uppercase, hidden ones as `_`, e.g. `"D _ _ C _"`.
    #[must_use]
    pub fn display(&self, secret: &SecretWord) -> String {
        secret
            .as_str()
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if self.is_revealed(i) {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
