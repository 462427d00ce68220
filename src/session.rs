//! Host loop tying the game core to its collaborators.
//!
//! The loop fetches a secret word, reads user actions from a
//! [`GameInterface`], checks complete guesses against a [`Dictionary`]
//! before they are scored, and hands every new snapshot back to the
//! interface for rendering.

use crate::config::Settings;
use crate::error::Result;
use crate::game_state::{Game, GameStatus, Key};
use crate::hints::LetterHints;
use crate::wordbank::{Dictionary, WordSupply};
use crate::{debug_log, info_log};
use log::{error, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    /// A single key press.
    Key(Key),
    /// A whole word typed at once, submitted immediately.
    Guess(String),
    RevealHint,
    NewGame,
    Exit,
}

/// Presentation layer: renders game snapshots and produces user actions.
pub trait GameInterface {
    /// Next action, or `None` when the input produced nothing to act on.
    fn read_action(&mut self, game: &Game) -> Option<UserAction>;
    /// Ask before abandoning a game that already has submitted guesses.
    fn confirm_new_game(&mut self, game: &Game) -> bool;
    fn display_new_game(&mut self, game: &Game);
    fn display_game(&mut self, game: &Game);
    fn display_invalid_guess(&mut self, guess: &str);
    fn display_wrong_length(&mut self, game: &Game);
    fn display_hint(&mut self, revealed: &str);
    fn display_game_over(&mut self, game: &Game);
    fn display_error(&mut self, message: &str);
    fn display_exit_message(&mut self);
}

fn start_game<S, I>(
    supply: &mut S,
    interface: &mut I,
    settings: &Settings,
) -> Result<(Game, LetterHints)>
where
    S: WordSupply + ?Sized,
    I: GameInterface + ?Sized,
{
    let secret = match supply.fetch_secret_word(settings.word_length) {
        Ok(secret) => secret,
        Err(e) => {
            error!("Failed to fetch a secret word: {e}");
            interface.display_error(&format!("Could not load a word: {e}"));
            return Err(e);
        }
    };
    let hints = LetterHints::new(secret.len());
    let game = Game::new(secret, settings.max_guesses)?;
    interface.display_new_game(&game);
    Ok((game, hints))
}

/// Validate the current guess, then score it. An unknown word leaves the
/// game unchanged.
fn submit_checked<D, I>(
    game: &Game,
    dictionary: &mut D,
    interface: &mut I,
    settings: &Settings,
) -> Result<Game>
where
    D: Dictionary + ?Sized,
    I: GameInterface + ?Sized,
{
    let word = game.current_guess().word();
    let is_valid = match dictionary.is_real_word(&word) {
        Ok(valid) => valid,
        Err(e) => {
            warn!(
                "Dictionary check for '{word}' failed ({e}), treating as {}",
                if settings.fail_open { "valid" } else { "invalid" }
            );
            settings.fail_open
        }
    };
    if !is_valid {
        info_log!("submit_checked() - rejected '{}'", word);
        interface.display_invalid_guess(&word);
        return Ok(game.clone());
    }

    let next = game.submit_guess()?;
    interface.display_game(&next);
    if next.status().is_terminal() {
        info_log!(
            "submit_checked() - game over: {:?} after {} guesses",
            next.status(),
            next.guesses_used()
        );
        interface.display_game_over(&next);
    }
    Ok(next)
}

/// Run games until the player exits.
///
/// Returns an error only when no game can be started (the word supply
/// failed) or the core reports a contract violation.
pub fn game_loop<S, D, I>(
    supply: &mut S,
    dictionary: &mut D,
    interface: &mut I,
    settings: &Settings,
) -> Result<()>
where
    S: WordSupply + ?Sized,
    D: Dictionary + ?Sized,
    I: GameInterface + ?Sized,
{
    let (mut game, mut hints) = start_game(supply, interface, settings)?;

    loop {
        let Some(action) = interface.read_action(&game) else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                return Ok(());
            }
            UserAction::NewGame
                if game.status() == GameStatus::Playing
                    && game.guesses_used() > 0
                    && !interface.confirm_new_game(&game) =>
            {
                debug_log!("game_loop() - new game cancelled");
                interface.display_game(&game);
            }
            UserAction::NewGame => {
                (game, hints) = start_game(supply, interface, settings)?;
            }
            _ if game.status().is_terminal() => {
                debug_log!("game_loop() - game over, ignoring {:?}", action);
            }
            UserAction::RevealHint => {
                if hints.reveal_next().is_none() {
                    debug_log!("game_loop() - every letter already revealed");
                }
                interface.display_hint(&hints.display(game.secret()));
            }
            UserAction::Key(Key::Enter) if !game.is_current_guess_full() => {
                interface.display_wrong_length(&game);
            }
            UserAction::Key(Key::Enter) => {
                game = submit_checked(&game, dictionary, interface, settings)?;
            }
            UserAction::Key(key) => {
                game = game.handle_key(key)?;
                interface.display_game(&game);
            }
            UserAction::Guess(word) => {
                if word.chars().count() != game.word_length()
                    || !word.chars().all(|c| c.is_ascii_alphabetic())
                {
                    interface.display_wrong_length(&game);
                    continue;
                }
                let typed = game.with_current_word(&word);
                game = submit_checked(&typed, dictionary, interface, settings)?;
            }
        }
    }
}
