//! Word supply and guess validation backed by a local word bank.

use crate::config::is_valid_word_length;
use crate::error::{GameError, Result};
use crate::evaluator::SecretWord;
use crate::info_log;
use crate::seen_words::SeenWordStore;
use log::warn;
use rand::Rng;
use rand::seq::SliceRandom;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

/// Word played in debug mode.
pub const DEBUG_WORD: &str = "deice";

/// Seen-word store shared between the word supply and the dictionary.
pub type SharedSeenWords = Rc<RefCell<SeenWordStore>>;

fn normalize(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    (is_valid_word_length(word.len()) && word.chars().all(|c| c.is_ascii_alphabetic()))
        .then_some(word)
}

pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    data.lines().filter_map(normalize).collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line?) {
            words.push(word);
        }
    }
    Ok(words)
}

/// Source of secret words.
pub trait WordSupply {
    fn fetch_secret_word(&mut self, length: usize) -> Result<SecretWord>;
}

/// Checks whether a guess is a real word.
pub trait Dictionary {
    fn is_real_word(&mut self, candidate: &str) -> Result<bool>;
}

/// Picks random words from a word bank and records them as seen.
pub struct WordbankSupply<R: Rng> {
    words: Vec<String>,
    rng: R,
    seen: Option<SharedSeenWords>,
}

impl<R: Rng> WordbankSupply<R> {
    pub fn new(words: Vec<String>, rng: R) -> Self {
        Self {
            words,
            rng,
            seen: None,
        }
    }

    #[must_use]
    pub fn with_seen_words(mut self, seen: SharedSeenWords) -> Self {
        self.seen = Some(seen);
        self
    }
}

impl<R: Rng> WordSupply for WordbankSupply<R> {
    fn fetch_secret_word(&mut self, length: usize) -> Result<SecretWord> {
        let matching: Vec<&String> = self.words.iter().filter(|w| w.len() == length).collect();
        let word = matching
            .choose(&mut self.rng)
            .ok_or(GameError::NoWordsOfLength(length))?;
        info_log!(
            "WordbankSupply - picked a {}-letter word out of {}",
            length,
            matching.len()
        );

        if let Some(seen) = &self.seen
            && let Err(e) = seen.borrow_mut().save_word(word)
        {
            warn!("Failed to record seen word: {e}");
        }
        SecretWord::new(word)
    }
}

/// Picks random words from the previously seen words.
pub struct SeenWordSupply<R: Rng> {
    seen: SharedSeenWords,
    rng: R,
}

impl<R: Rng> SeenWordSupply<R> {
    pub fn new(seen: SharedSeenWords, rng: R) -> Self {
        Self { seen, rng }
    }
}

impl<R: Rng> WordSupply for SeenWordSupply<R> {
    fn fetch_secret_word(&mut self, length: usize) -> Result<SecretWord> {
        let seen = self.seen.borrow();
        let word = seen
            .random_word(length, &mut self.rng)
            .ok_or(GameError::NoWordsOfLength(length))?;
        SecretWord::new(word)
    }
}

/// Always supplies the same word, whatever length is asked for.
pub struct FixedWordSupply {
    word: String,
}

impl FixedWordSupply {
    pub fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
        }
    }
}

impl Default for FixedWordSupply {
    fn default() -> Self {
        Self::new(DEBUG_WORD)
    }
}

impl WordSupply for FixedWordSupply {
    fn fetch_secret_word(&mut self, length: usize) -> Result<SecretWord> {
        if length != self.word.len() {
            warn!(
                "FixedWordSupply ignoring requested length {length}, playing '{}'",
                self.word
            );
        }
        SecretWord::new(&self.word)
    }
}

/// Validates guesses against the seen words first, then the word bank.
/// Word-bank hits are added to the seen words.
pub struct WordbankDictionary {
    words: HashSet<String>,
    seen: Option<SharedSeenWords>,
    enabled: bool,
}

impl WordbankDictionary {
    pub fn new(words: &[String]) -> Self {
        Self {
            words: words.iter().cloned().collect(),
            seen: None,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_seen_words(mut self, seen: SharedSeenWords) -> Self {
        self.seen = Some(seen);
        self
    }

    /// With validation disabled every candidate is accepted.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Dictionary for WordbankDictionary {
    fn is_real_word(&mut self, candidate: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(true);
        }
        let candidate = candidate.to_lowercase();

        if let Some(seen) = &self.seen
            && seen.borrow().contains(&candidate)
        {
            return Ok(true);
        }
        if !self.words.contains(&candidate) {
            info_log!("WordbankDictionary - '{}' is not a known word", candidate);
            return Ok(false);
        }
        if let Some(seen) = &self.seen
            && let Err(e) = seen.borrow_mut().save_word(&candidate)
        {
            warn!("Failed to record seen word: {e}");
        }
        Ok(true)
    }
}
