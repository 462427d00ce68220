//! TUI (Terminal User Interface) front end.
//!
//! Renders the guess board and an on-screen keyboard with Ratatui and turns
//! key presses into [`UserAction`]s for the game loop.
//!
//! # Keys
//! - Letters, `Backspace`, `Enter` edit and submit the current guess
//! - `Tab` reveals one letter of the answer
//! - `Esc` quits; `N` starts a new game once the current one is over
//! - `F2` starts a new game at any time, after a Y/N prompt if guesses were made

use crate::cli::format_win_message;
use crate::evaluator::Feedback;
use crate::game_state::{Game, GameStatus, Guess, Key};
use crate::keyboard::{KeyboardState, LetterHighlight};
use crate::session::{GameInterface, UserAction};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Debug)]
enum TileState {
    Empty,
    Entered,
    Match,        // Green
    PartialMatch, // Yellow
    NoMatch,      // Gray
}

impl TileState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Empty | Self::Entered => (Color::DarkGray, Color::White),
            Self::Match => (Color::Green, Color::Black),
            Self::PartialMatch => (Color::Yellow, Color::Black),
            Self::NoMatch => (Color::Gray, Color::White),
        }
    }

    fn from_highlight(highlight: Option<LetterHighlight>) -> Self {
        match highlight {
            Some(LetterHighlight::CorrectInPosition) => Self::Match,
            Some(LetterHighlight::CorrectButMisplaced) => Self::PartialMatch,
            Some(LetterHighlight::Incorrect) => Self::NoMatch,
            None => Self::Empty,
        }
    }
}

/// Tiles for one board row, padded to the word length.
fn row_tiles(guess: &Guess, word_length: usize) -> Vec<(char, TileState)> {
    let feedback = guess.feedback();
    (0..word_length)
        .map(|i| match guess.letters().get(i) {
            None => (' ', TileState::Empty),
            Some(&c) => {
                let state = match feedback.as_ref().map(|f| f[i]) {
                    Some(Feedback::Match) => TileState::Match,
                    Some(Feedback::PartialMatch) => TileState::PartialMatch,
                    Some(Feedback::NoMatch) => TileState::NoMatch,
                    None => TileState::Entered,
                };
                (c.to_ascii_uppercase(), state)
            }
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
enum KeyInput {
    Action(UserAction),
    Rejected(String),
    Ignored,
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Map a key press to an action for the current game.
fn action_for_key(key: KeyEvent, game_over: bool) -> KeyInput {
    if has_modifier_keys(&key) {
        debug_log!("action_for_key() - ignoring modifiers {:?}", key.modifiers);
        return KeyInput::Ignored;
    }
    match key.code {
        KeyCode::Esc => KeyInput::Action(UserAction::Exit),
        KeyCode::Char('n' | 'N') if game_over => KeyInput::Action(UserAction::NewGame),
        KeyCode::F(2) => KeyInput::Action(UserAction::NewGame),
        _ if game_over => KeyInput::Ignored,
        KeyCode::Tab => KeyInput::Action(UserAction::RevealHint),
        KeyCode::Enter => KeyInput::Action(UserAction::Key(Key::Enter)),
        KeyCode::Backspace => KeyInput::Action(UserAction::Key(Key::Backspace)),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            KeyInput::Action(UserAction::Key(Key::Letter(c.to_ascii_lowercase())))
        }
        KeyCode::Char(c) => {
            KeyInput::Rejected(format!("Only letters are allowed! ('{c}' is not a letter)"))
        }
        _ => KeyInput::Ignored,
    }
}

/// Answer to the new-game prompt: `Some(true)` for Y, `Some(false)` for N or Esc.
fn confirmation_for_key(key: KeyEvent) -> Option<bool> {
    match key.code {
        KeyCode::Char('y' | 'Y') => Some(true),
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(false),
        _ => None,
    }
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    game: Option<&'a Game>,
    message: &'a str,
    hint: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    game: Option<Game>,
    message: String,
    hint: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            game: None,
            message: String::new(),
            hint: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            game: self.game.as_ref(),
            message: &self.message,
            hint: &self.hint,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(14), // Game board
                Constraint::Length(5),  // Keyboard
                Constraint::Min(4),     // Info panel
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        if let Some(game) = ctx.game {
            Self::render_board(f, chunks[1], game);
            Self::render_keyboard(f, chunks[2], game.keyboard());
        }
        Self::render_info(f, chunks[3], ctx);
        Self::render_status(f, chunks[4], ctx.status);
        Self::render_instructions(
            f,
            chunks[5],
            ctx.game.is_some_and(|g| g.status().is_terminal()),
        );
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORDLE")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, game: &Game) {
        let block = Block::default().title("Guesses").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        // Keep the current row on screen when the board is taller than the area
        let available_rows = (inner.height / ROW_SPACING) as usize;
        let skip_count = (game.current_index() + 1).saturating_sub(available_rows);

        for (display_index, guess) in game.history().iter().skip(skip_count).enumerate() {
            Self::render_guess_row(f, &row_tiles(guess, game.word_length()), display_index, inner);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_guess_row(f: &mut Frame, tiles: &[(char, TileState)], row_index: usize, area: Rect) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for &(letter, state) in tiles {
            let (bg_color, fg_color) = state.colors();
            spans.push(Span::styled(
                format!(" {letter} "),
                Style::default().fg(fg_color).bg(bg_color),
            ));
            spans.push(Span::raw(" "));
        }
        Self::render_line(f, area, y, spans);
    }

    fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
        let paragraph = Paragraph::new(Line::from(spans));
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_keyboard(f: &mut Frame, area: Rect, keyboard: &KeyboardState) {
        let lines: Vec<Line> = KEYBOARD_ROWS
            .iter()
            .enumerate()
            .map(|(indent, row)| {
                let mut spans = vec![Span::raw(" ".repeat(indent + 1))];
                for letter in row.chars() {
                    let (bg_color, fg_color) =
                        TileState::from_highlight(keyboard.highlight(letter)).colors();
                    spans.push(Span::styled(
                        format!("{letter}"),
                        Style::default().fg(fg_color).bg(bg_color),
                    ));
                    spans.push(Span::raw(" "));
                }
                Line::from(spans)
            })
            .collect();

        let paragraph =
            Paragraph::new(lines).block(Block::default().title("Keyboard").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(game) = ctx.game {
            match game.status() {
                GameStatus::Winner => lines.push(Line::from(vec![Span::styled(
                    format_win_message(game.guesses_used()),
                    SUCCESS_STYLE,
                )])),
                GameStatus::Loser => lines.push(Line::from(vec![Span::styled(
                    format!("Answer: {}", game.secret().as_str().to_uppercase()),
                    INFO_STYLE,
                )])),
                GameStatus::Playing => {}
            }
        }
        if !ctx.hint.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Hint: ", INFO_STYLE),
                Span::raw(ctx.hint),
            ]));
        }
        if !ctx.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.message, MESSAGE_STYLE)]));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, game_over: bool) {
        let text = if game_over {
            "N: New Game | ESC: Quit"
        } else {
            "Type your guess | ENTER: Submit | BACKSPACE: Delete | TAB: Hint | F2: New Game | ESC: Quit"
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self, game_over: bool) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Terminal focus changes (alt-tab) can leak replacement or control characters
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character {:?}", c);
            return Ok(None);
        }

        debug_log!(
            "handle_input() - Key event received: code={:?}, modifiers={:?}",
            key.code,
            key.modifiers
        );
        match action_for_key(key, game_over) {
            KeyInput::Action(action) => {
                self.error_message.clear();
                Ok(Some(action))
            }
            KeyInput::Rejected(message) => {
                self.error_message = message;
                Ok(None)
            }
            KeyInput::Ignored => Ok(None),
        }
    }
}

impl GameInterface for TuiInterface {
    fn read_action(&mut self, game: &Game) -> Option<UserAction> {
        self.game = Some(game.clone());
        let game_over = game.status().is_terminal();
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }
            match self.handle_input(game_over) {
                Ok(Some(action)) => {
                    debug_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Error handling input ({}), returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn confirm_new_game(&mut self, game: &Game) -> bool {
        self.game = Some(game.clone());
        self.status = "Lose all progress and start over with a new word? (Y/N)".to_string();
        let answer = loop {
            self.draw_or_log();
            match event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    debug_log!("confirm_new_game() - poll error: {}", e);
                    break false;
                }
            }
            match event::read() {
                Ok(Event::Key(key)) if key.kind == event::KeyEventKind::Press => {
                    if let Some(answer) = confirmation_for_key(key) {
                        break answer;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug_log!("confirm_new_game() - read error: {}", e);
                    break false;
                }
            }
        };
        info_log!("confirm_new_game() - answered {}", answer);
        self.status = "Continuing current game".to_string();
        answer
    }

    fn display_new_game(&mut self, game: &Game) {
        self.game = Some(game.clone());
        self.message = format!(
            "New game: guess the {}-letter word in {} tries.",
            game.word_length(),
            game.max_guesses()
        );
        self.hint.clear();
        self.error_message.clear();
        self.status = "New game - Enter your first guess".to_string();
        self.draw_or_log();
    }

    fn display_game(&mut self, game: &Game) {
        self.game = Some(game.clone());
        if game.status() == GameStatus::Playing {
            self.status = format!(
                "Guess {} of {}",
                game.current_index() + 1,
                game.max_guesses()
            );
        }
        self.draw_or_log();
    }

    fn display_invalid_guess(&mut self, guess: &str) {
        self.error_message = format!("'{}' is not in the word list.", guess.to_uppercase());
        self.draw_or_log();
    }

    fn display_wrong_length(&mut self, game: &Game) {
        self.error_message = format!("Guess must be exactly {} letters!", game.word_length());
        self.draw_or_log();
    }

    fn display_hint(&mut self, revealed: &str) {
        revealed.clone_into(&mut self.hint);
        self.draw_or_log();
    }

    fn display_game_over(&mut self, game: &Game) {
        self.game = Some(game.clone());
        self.status = match game.status() {
            GameStatus::Winner => "Game Over - Solved!".to_string(),
            _ => "Game Over - Out of guesses".to_string(),
        };
        self.message.clear();
        self.draw_or_log();
    }

    fn display_error(&mut self, message: &str) {
        message.clone_into(&mut self.error_message);
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
