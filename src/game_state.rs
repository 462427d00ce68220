//! Game state machine.
//!
//! A [`Game`] is an immutable snapshot: every edit or submission returns a
//! new snapshot and leaves the old one untouched.
//!
//! # State Machine
//! - `Playing` → `Winner` when a submitted guess matches every position
//! - `Playing` → `Loser` when the final guess slot is used without winning
//! - `Winner` and `Loser` are terminal; no further guesses are accepted

use crate::error::{GameError, Result};
use crate::evaluator::{Evaluation, Feedback, SecretWord, evaluate, feedback_for};
use crate::keyboard::KeyboardState;
use crate::{debug_log, info_log};
use log::error;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Winner,
    Loser,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// A single key event, already filtered to something the game understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Backspace,
    Enter,
}

impl Key {
    /// Parse `"enter"`, `"backspace"` or a single letter (any case).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let lowered = input.to_ascii_lowercase();
        match lowered.as_str() {
            "enter" => Some(Self::Enter),
            "backspace" => Some(Self::Backspace),
            _ => {
                let mut chars = lowered.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Some(Self::Letter(c)),
                    _ => None,
                }
            }
        }
    }
}

/// One row of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Guess {
    letters: Vec<char>,
    exact_positions: BTreeSet<usize>,
    misplaced_positions: BTreeSet<usize>,
    is_submitted: bool,
}

impl Guess {
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    #[must_use]
    pub fn word(&self) -> String {
        self.letters.iter().collect()
    }

    #[must_use]
    pub fn exact_positions(&self) -> &BTreeSet<usize> {
        &self.exact_positions
    }

    #[must_use]
    pub fn misplaced_positions(&self) -> &BTreeSet<usize> {
        &self.misplaced_positions
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Per-position feedback; `None` until the guess has been submitted.
    #[must_use]
    pub fn feedback(&self) -> Option<Vec<Feedback>> {
        if !self.is_submitted {
            return None;
        }
        Some(feedback_for(
            self.letters.len(),
            &self.exact_positions,
            &self.misplaced_positions,
        ))
    }

    fn apply(&mut self, evaluation: &Evaluation) {
        self.exact_positions.clone_from(evaluation.exact_positions());
        self.misplaced_positions.clone_from(evaluation.misplaced_positions());
        self.is_submitted = true;
    }
}

/// Snapshot of one game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    secret: SecretWord,
    history: Vec<Guess>,
    current_index: usize,
    status: GameStatus,
    keyboard: KeyboardState,
}

impl Game {
    /// Start a game with `max_guesses` empty guess slots.
    pub fn new(secret: SecretWord, max_guesses: usize) -> Result<Self> {
        if max_guesses == 0 {
            return Err(GameError::ContractViolation(
                "a game needs at least one guess slot".to_string(),
            ));
        }
        info_log!(
            "Game::new() - {}-letter word, {} guesses",
            secret.len(),
            max_guesses
        );
        Ok(Self {
            secret,
            history: vec![Guess::default(); max_guesses],
            current_index: 0,
            status: GameStatus::Playing,
            keyboard: KeyboardState::new(),
        })
    }

    #[must_use]
    pub fn secret(&self) -> &SecretWord {
        &self.secret
    }

    #[must_use]
    pub fn history(&self) -> &[Guess] {
        &self.history
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_guess(&self) -> &Guess {
        &self.history[self.current_index]
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.secret.len()
    }

    #[must_use]
    pub fn max_guesses(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn guesses_used(&self) -> usize {
        self.history.iter().filter(|g| g.is_submitted).count()
    }

    /// True when the current guess has as many letters as the secret word.
    #[must_use]
    pub fn is_current_guess_full(&self) -> bool {
        self.current_guess().letters.len() == self.word_length()
    }

    /// Append a letter to the current guess. No-op when the guess is full,
    /// the game is over, or `letter` is not an ASCII letter.
    #[must_use]
    pub fn push_letter(&self, letter: char) -> Self {
        if self.status.is_terminal()
            || !letter.is_ascii_alphabetic()
            || self.is_current_guess_full()
        {
            debug_log!("push_letter() - ignoring {:?}", letter);
            return self.clone();
        }
        let mut next = self.clone();
        next.history[next.current_index]
            .letters
            .push(letter.to_ascii_lowercase());
        next
    }

    /// Remove the last letter of the current guess. No-op when it is empty
    /// or the game is over.
    #[must_use]
    pub fn pop_letter(&self) -> Self {
        if self.status.is_terminal() {
            return self.clone();
        }
        let mut next = self.clone();
        next.history[next.current_index].letters.pop();
        next
    }

    /// Replace the current guess with `word`, keeping at most one word's worth
    /// of letters. Used by front ends that read whole words at once.
    #[must_use]
    pub fn with_current_word(&self, word: &str) -> Self {
        if self.status.is_terminal() {
            return self.clone();
        }
        let mut next = self.clone();
        next.history[next.current_index].letters.clear();
        word.chars().fold(next, |game, c| game.push_letter(c))
    }

    /// Score the current guess and advance the game.
    ///
    /// The guess must be complete and the game must still be in progress;
    /// otherwise this is a [`GameError::ContractViolation`].
    pub fn submit_guess(&self) -> Result<Self> {
        if self.status.is_terminal() {
            error!("submit_guess() called on a finished game ({:?})", self.status);
            return Err(GameError::ContractViolation(format!(
                "cannot submit a guess when the game is {:?}",
                self.status
            )));
        }
        if !self.is_current_guess_full() {
            error!(
                "submit_guess() called with {} of {} letters",
                self.current_guess().letters.len(),
                self.word_length()
            );
            return Err(GameError::ContractViolation(format!(
                "guess has {} letters but the secret word has {}",
                self.current_guess().letters.len(),
                self.word_length()
            )));
        }

        let evaluation = evaluate(&self.secret, &self.current_guess().letters)?;
        let mut next = self.clone();
        next.history[next.current_index].apply(&evaluation);
        next.keyboard.record(&evaluation);

        if evaluation.is_solved() {
            next.status = GameStatus::Winner;
        } else if next.current_index >= next.max_guesses() - 1 {
            next.status = GameStatus::Loser;
        } else {
            next.current_index += 1;
        }

        info_log!(
            "submit_guess() - guess {} '{}' scored {}, status {:?}",
            self.current_index + 1,
            self.current_guess().word(),
            evaluation.pattern(),
            next.status
        );
        Ok(next)
    }

    /// Apply a key event. Enter on an incomplete guess is ignored; Enter on
    /// a finished game is a contract violation.
    pub fn handle_key(&self, key: Key) -> Result<Self> {
        match key {
            Key::Letter(c) => Ok(self.push_letter(c)),
            Key::Backspace => Ok(self.pop_letter()),
            Key::Enter if !self.status.is_terminal() && !self.is_current_guess_full() => {
                debug_log!("handle_key() - Enter on incomplete guess ignored");
                Ok(self.clone())
            }
            Key::Enter => self.submit_guess(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_game(secret: &str) -> Game {
        Game::new(SecretWord::new(secret).unwrap(), 6).unwrap()
    }

    fn type_word(game: &Game, word: &str) -> Game {
        word.chars().fold(game.clone(), |g, c| g.push_letter(c))
    }

    fn play(game: &Game, word: &str) -> Game {
        type_word(game, word).submit_guess().unwrap()
    }

    #[test]
    fn test_new_game_is_empty() {
        let game = new_game("deice");
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.current_index(), 0);
        assert_eq!(game.history().len(), 6);
        assert!(game.history().iter().all(|g| g.is_empty() && !g.is_submitted()));
        assert_eq!(game.word_length(), 5);
        assert_eq!(game.guesses_used(), 0);
    }

    #[test]
    fn test_zero_guesses_rejected() {
        let result = Game::new(SecretWord::new("deice").unwrap(), 0);
        assert!(matches!(result, Err(GameError::ContractViolation(_))));
    }

    #[test]
    fn test_winning_guess() {
        let game = play(&new_game("deice"), "deice");
        assert_eq!(game.status(), GameStatus::Winner);
        assert_eq!(game.current_index(), 0);
        let guess = &game.history()[0];
        assert!(guess.is_submitted());
        assert_eq!(guess.exact_positions().len(), 5);
        assert_eq!(guess.feedback(), Some(vec![Feedback::Match; 5]));
    }

    #[test]
    fn test_non_winning_guess_advances() {
        let game = play(&new_game("there"), "eerie");
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.current_index(), 1);
        let guess = &game.history()[0];
        assert_eq!(guess.exact_positions(), &BTreeSet::from([4]));
        assert_eq!(guess.misplaced_positions(), &BTreeSet::from([0, 2]));
        assert!(game.keyboard().correct_in_position().contains(&'E'));
    }

    #[test]
    fn test_six_losing_guesses() {
        let mut game = new_game("deice");
        for _ in 0..6 {
            assert_eq!(game.status(), GameStatus::Playing);
            game = play(&game, "crane");
        }
        assert_eq!(game.status(), GameStatus::Loser);
        assert_eq!(game.current_index(), 5);
        assert_eq!(game.guesses_used(), 6);
    }

    #[test]
    fn test_win_on_last_guess() {
        let mut game = new_game("deice");
        for _ in 0..5 {
            game = play(&game, "crane");
        }
        let game = play(&game, "deice");
        assert_eq!(game.status(), GameStatus::Winner);
        assert_eq!(game.current_index(), 5);
    }

    #[test]
    fn test_submit_after_game_over_is_rejected() {
        let game = play(&new_game("deice"), "deice");
        assert!(matches!(
            game.submit_guess(),
            Err(GameError::ContractViolation(_))
        ));
        assert!(game.handle_key(Key::Enter).is_err());
    }

    #[test]
    fn test_submit_incomplete_guess_is_rejected() {
        let game = type_word(&new_game("deice"), "dei");
        assert!(matches!(
            game.submit_guess(),
            Err(GameError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_enter_on_incomplete_guess_is_noop() {
        let game = type_word(&new_game("deice"), "dei");
        let after = game.handle_key(Key::Enter).unwrap();
        assert_eq!(after, game);
    }

    #[test]
    fn test_push_letter_bounded_by_word_length() {
        let game = type_word(&new_game("deice"), "abcdefg");
        assert_eq!(game.current_guess().word(), "abcde");
    }

    #[test]
    fn test_push_letter_lowercases_and_filters() {
        let game = new_game("deice").push_letter('D').push_letter('3');
        assert_eq!(game.current_guess().letters(), &['d']);
    }

    #[test]
    fn test_pop_letter_on_empty_is_noop() {
        let game = new_game("deice");
        assert_eq!(game.pop_letter(), game);
    }

    #[test]
    fn test_backspace_is_lifo() {
        let game = type_word(&new_game("deice"), "dei");
        let game = game.handle_key(Key::Backspace).unwrap();
        assert_eq!(game.current_guess().word(), "de");
    }

    #[test]
    fn test_edits_ignored_after_game_over() {
        let game = play(&new_game("deice"), "deice");
        assert_eq!(game.push_letter('a'), game);
        assert_eq!(game.pop_letter(), game);
    }

    #[test]
    fn test_snapshots_are_independent() {
        let before = type_word(&new_game("deice"), "crane");
        let after = before.submit_guess().unwrap();
        assert!(!before.current_guess().is_submitted());
        assert_eq!(before.current_index(), 0);
        assert!(after.history()[0].is_submitted());
    }

    #[test]
    fn test_with_current_word_replaces_input() {
        let game = type_word(&new_game("deice"), "ab");
        let game = game.with_current_word("crane");
        assert_eq!(game.current_guess().word(), "crane");
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse("enter"), Some(Key::Enter));
        assert_eq!(Key::parse("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::parse("Q"), Some(Key::Letter('q')));
        assert_eq!(Key::parse("1"), None);
        assert_eq!(Key::parse("ab"), None);
        assert_eq!(Key::parse(""), None);
    }

    #[test]
    fn test_keyboard_accumulates_across_guesses() {
        let game = play(&new_game("crane"), "acorn");
        let game = play(&game, "brand");
        let keyboard = game.keyboard();
        assert!(keyboard.correct_in_position().contains(&'A'));
        assert!(!keyboard.correct_but_misplaced().contains(&'A'));
        assert!(keyboard.correct_but_misplaced().contains(&'C'));
        assert!(keyboard.incorrect().contains(&'O'));
        assert!(keyboard.incorrect().contains(&'B'));
    }
}
