use crate::config::{Settings, is_valid_word_length};
use crate::game_state::{Game, GameStatus, Guess};
use crate::keyboard::KeyboardState;
use crate::session::{GameInterface, UserAction};
use clap::Parser;
use log::warn;
use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Word-guessing puzzle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited wordbank file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Word length (4-10); remembered for later games
    #[arg(short = 'l', long = "length", value_parser = parse_word_length)]
    pub word_length: Option<usize>,

    /// Full-screen interface
    #[arg(long)]
    pub tui: bool,

    /// Always play the fixed test word
    #[arg(long)]
    pub debug: bool,

    /// Pick secret words from previously seen words
    #[arg(long)]
    pub seen: bool,

    /// Accept any guess without checking the word list
    #[arg(long = "no-validate")]
    pub no_validate: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

fn parse_word_length(value: &str) -> Result<usize, String> {
    let length: usize = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if is_valid_word_length(length) {
        Ok(length)
    } else {
        Err(format!("word length must be between 4 and 10, got {length}"))
    }
}

impl Cli {
    /// Override stored settings with the flags given on the command line.
    /// Returns true if a persistent setting changed.
    pub fn apply_to(&self, settings: &mut Settings) -> bool {
        let mut changed = false;
        if let Some(length) = self.word_length
            && length != settings.word_length
        {
            settings.word_length = length;
            changed = true;
        }
        if self.debug {
            settings.debug_mode = true;
        }
        if self.seen {
            settings.load_from_seen_words = true;
        }
        if self.no_validate {
            settings.check_guess_validity = false;
        }
        changed
    }
}

// UI Input/Output functions

#[derive(Debug, PartialEq, Eq)]
enum LineInput {
    Action(UserAction),
    Invalid,
}

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_line(input: &str) -> LineInput {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "exit" => LineInput::Action(UserAction::Exit),
        "next" => LineInput::Action(UserAction::NewGame),
        "hint" => LineInput::Action(UserAction::RevealHint),
        _ if is_valid_word(&input) => LineInput::Action(UserAction::Guess(input)),
        _ => LineInput::Invalid,
    }
}

/// One submitted row, e.g. `C R A N E   X Y G X X`.
#[must_use]
pub fn format_guess_row(guess: &Guess) -> String {
    let letters: Vec<String> = guess
        .letters()
        .iter()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect();
    let marks: Vec<String> = guess
        .feedback()
        .unwrap_or_default()
        .into_iter()
        .map(|f| f.to_char().to_string())
        .collect();
    format!("{}   {}", letters.join(" "), marks.join(" "))
}

fn format_letters(letters: impl IntoIterator<Item = char>) -> String {
    let joined: Vec<String> = letters.into_iter().map(String::from).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(" ")
    }
}

/// e.g. `You won in 1 guess!`
#[must_use]
pub fn format_win_message(guesses: usize) -> String {
    let noun = if guesses == 1 { "guess" } else { "guesses" };
    format!("You won in {guesses} {noun}!")
}

#[must_use]
pub fn format_keyboard(keyboard: &KeyboardState) -> String {
    format!(
        "Correct: {} | Misplaced: {} | Not in word: {}",
        format_letters(keyboard.correct_in_position().iter().copied()),
        format_letters(keyboard.correct_but_misplaced().iter().copied()),
        format_letters(keyboard.incorrect().iter().copied())
    )
}

/// CLI implementation of the `GameInterface` trait.
/// Reads whole-word guesses and commands line by line from `reader`.
pub struct CliInterface<R: BufRead, W: Write = io::Stdout> {
    reader: R,
    writer: W,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn say(&mut self, line: impl Display) {
        if let Err(e) = writeln!(self.writer, "{line}") {
            warn!("Failed to write to terminal: {e}");
        }
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn read_action(&mut self, game: &Game) -> Option<UserAction> {
        if game.status().is_terminal() {
            self.say("\nType 'next' for a new game or 'exit' to quit:");
        } else {
            self.say(format!(
                "\nEnter your guess ({} letters, 'hint' for a letter, 'next' for a new game, 'exit' to quit):",
                game.word_length()
            ));
        }

        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => return Some(UserAction::Exit),
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read input: {e}");
                return Some(UserAction::Exit);
            }
        }

        match parse_line(&input) {
            LineInput::Action(action) => Some(action),
            LineInput::Invalid => {
                self.say(format!(
                    "Invalid guess. Please enter {} letters.",
                    game.word_length()
                ));
                None
            }
        }
    }

    fn confirm_new_game(&mut self, _game: &Game) -> bool {
        self.say("Lose all progress on the current game and start over with a new word? (y/n)");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(_) => matches!(input.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Failed to read input: {e}");
                false
            }
        }
    }

    fn display_new_game(&mut self, game: &Game) {
        self.say(format!(
            "New game started: guess the {}-letter word in {} tries.",
            game.word_length(),
            game.max_guesses()
        ));
    }

    fn display_game(&mut self, game: &Game) {
        let rows: Vec<String> = game
            .history()
            .iter()
            .filter(|g| g.is_submitted())
            .map(format_guess_row)
            .collect();
        for row in rows {
            self.say(row);
        }
        self.say(format_keyboard(game.keyboard()));
        if game.status() == GameStatus::Playing {
            self.say(format!(
                "Guesses left: {}",
                game.max_guesses() - game.guesses_used()
            ));
        }
    }

    fn display_invalid_guess(&mut self, guess: &str) {
        self.say(format!("'{}' is not in the word list.", guess.to_uppercase()));
    }

    fn display_wrong_length(&mut self, game: &Game) {
        self.say(format!(
            "Guess must be exactly {} letters!",
            game.word_length()
        ));
    }

    fn display_hint(&mut self, revealed: &str) {
        self.say(format!("Hint: {revealed}"));
    }

    fn display_game_over(&mut self, game: &Game) {
        match game.status() {
            GameStatus::Winner => self.say(format_win_message(game.guesses_used())),
            GameStatus::Loser => self.say(format!(
                "You lost. Answer: {}",
                game.secret().as_str().to_uppercase()
            )),
            GameStatus::Playing => {}
        }
    }

    fn display_error(&mut self, message: &str) {
        self.say(format!("Error: {message}"));
    }

    fn display_exit_message(&mut self) {
        self.say("Exiting.");
    }
}
