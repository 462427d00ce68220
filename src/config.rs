use crate::error::Result;
use crate::info_log;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_GUESSES: usize = 6;
pub const DEFAULT_WORD_LENGTH: usize = 5;
pub const MIN_WORD_LENGTH: usize = 4;
pub const MAX_WORD_LENGTH: usize = 10;

/// Player settings, persisted between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub word_length: usize,
    pub max_guesses: usize,
    /// Reject guesses that are not known words.
    pub check_guess_validity: bool,
    /// Accept a guess when the dictionary check itself fails.
    pub fail_open: bool,
    /// Always play the fixed test word.
    pub debug_mode: bool,
    /// Pick secret words from previously seen words instead of the word bank.
    pub load_from_seen_words: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            max_guesses: MAX_GUESSES,
            check_guess_validity: true,
            fail_open: true,
            debug_mode: false,
            load_from_seen_words: false,
        }
    }
}

#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("wordle-game").join("settings.json"))
}

#[must_use]
pub fn is_valid_word_length(length: usize) -> bool {
    (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length)
}

impl Settings {
    /// True when every value is within its allowed range.
    #[must_use]
    pub fn validate(&self) -> bool {
        is_valid_word_length(self.word_length) && self.max_guesses > 0
    }

    /// Load settings from `path`.
    ///
    /// A missing or unreadable file yields the defaults. Stored values out of
    /// range are replaced by the defaults, which are written back.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let Ok(content) = fs::read_to_string(path) else {
            info_log!("Settings::load() - no settings at {}", path.display());
            return Self::default();
        };

        match serde_json::from_str::<Self>(&content) {
            Ok(settings) if settings.validate() => settings,
            Ok(settings) => {
                warn!("Invalid settings detected, falling back to defaults: {settings:?}");
                let defaults = Self::default();
                if let Err(e) = defaults.save(path) {
                    warn!("Failed to reset settings at {}: {e}", path.display());
                }
                defaults
            }
            Err(e) => {
                warn!("Failed to parse settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
