use crate::error::Result;
use crate::info_log;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenWord {
    pub word: String,
    /// RFC 3339 timestamp of the first time the word was seen.
    pub first_seen: String,
}

/// Words that have been used as secrets or accepted as guesses before,
/// persisted as a JSON array.
#[derive(Debug, Default)]
pub struct SeenWordStore {
    path: Option<PathBuf>,
    words: Vec<SeenWord>,
}

#[must_use]
pub fn default_seen_words_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("wordle-game").join("seen_words.json"))
}

impl SeenWordStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let words = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        info_log!(
            "SeenWordStore::open() - {} words from {}",
            words.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            words,
        })
    }

    /// A store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        let word = word.to_ascii_lowercase();
        self.words.iter().any(|w| w.word == word)
    }

    /// Record `word`. Returns true if it had not been seen before.
    pub fn save_word(&mut self, word: &str) -> Result<bool> {
        if self.contains(word) {
            return Ok(false);
        }
        self.words.push(SeenWord {
            word: word.to_ascii_lowercase(),
            first_seen: chrono::Utc::now().to_rfc3339(),
        });
        if let Err(e) = self.flush() {
            self.words.pop();
            return Err(e);
        }
        Ok(true)
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.words)?)?;
        Ok(())
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.word.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// A uniformly chosen seen word of `length` letters.
    pub fn random_word<R: Rng>(&self, length: usize, rng: &mut R) -> Option<&str> {
        let matching: Vec<&str> = self.words().filter(|w| w.len() == length).collect();
        matching.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn temp_path(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = temp_path("wordle_game_seen_missing.json");
        let store = SeenWordStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_word_persists() {
        let path = temp_path("wordle_game_seen_persist.json");
        {
            let mut store = SeenWordStore::open(&path).unwrap();
            assert!(store.save_word("Deice").unwrap());
            assert!(!store.save_word("deice").unwrap());
            assert!(store.save_word("crane").unwrap());
        }

        let store = SeenWordStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("DEICE"));
        assert!(store.contains("crane"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_first_seen_is_rfc3339() {
        let mut store = SeenWordStore::in_memory();
        store.save_word("deice").unwrap();
        let record = &store.words[0];
        assert!(chrono::DateTime::parse_from_rfc3339(&record.first_seen).is_ok());
    }

    #[test]
    fn test_failed_write_is_not_recorded() {
        // The parent "directory" is a regular file, so the write cannot succeed.
        let blocker = temp_path("wordle_game_seen_blocker");
        fs::write(&blocker, "").unwrap();
        let mut store = SeenWordStore::open(blocker.join("seen_words.json")).unwrap();

        assert!(store.save_word("deice").is_err());
        assert!(!store.contains("deice"));
        assert!(store.is_empty());

        fs::remove_file(&blocker).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = temp_path("wordle_game_seen_corrupt.json");
        fs::write(&path, "not json").unwrap();
        assert!(SeenWordStore::open(&path).is_err());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_random_word_respects_length() {
        let mut store = SeenWordStore::in_memory();
        for word in ["deice", "crane", "tree", "elephant"] {
            store.save_word(word).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        for _ in 0..20 {
            let word = store.random_word(5, &mut rng).unwrap();
            assert!(word == "deice" || word == "crane");
        }
        assert_eq!(store.random_word(4, &mut rng), Some("tree"));
        assert_eq!(store.random_word(9, &mut rng), None);
    }
}
