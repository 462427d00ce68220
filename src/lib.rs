// Library interface for wordle-game
// This allows integration tests to access internal modules

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod game_state;
pub mod hints;
pub mod keyboard;
pub mod logging;
pub mod seen_words;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use config::Settings;
pub use error::{GameError, Result};
pub use evaluator::{Evaluation, Feedback, SecretWord, evaluate};
pub use game_state::{Game, GameStatus, Guess, Key};
pub use keyboard::{KeyboardState, LetterHighlight};
pub use session::{GameInterface, UserAction, game_loop};
pub use wordbank::{load_wordbank_from_file, load_wordbank_from_str};
