use log::{error, warn};
use rand::thread_rng;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use wordle_game::cli::{CliInterface, parse_cli};
use wordle_game::config::{Settings, default_settings_path};
use wordle_game::logging::{default_log_path, init_logging};
use wordle_game::seen_words::{SeenWordStore, default_seen_words_path};
use wordle_game::session::{GameInterface, game_loop};
use wordle_game::tui::TuiInterface;
use wordle_game::wordbank::{
    Dictionary, EMBEDDED_WORDBANK, FixedWordSupply, SeenWordSupply, SharedSeenWords,
    WordSupply, WordbankDictionary, WordbankSupply, load_wordbank_from_file,
    load_wordbank_from_str,
};

fn open_seen_words() -> SharedSeenWords {
    let store = match default_seen_words_path().map(SeenWordStore::open) {
        Some(Ok(store)) => store,
        Some(Err(e)) => {
            warn!("Failed to open seen words, keeping them in memory: {e}");
            SeenWordStore::in_memory()
        }
        None => SeenWordStore::in_memory(),
    };
    Rc::new(RefCell::new(store))
}

fn main() {
    let cli = parse_cli();

    if let Some(path) = default_log_path()
        && let Err(e) = init_logging(&path)
    {
        eprintln!("Logging disabled: {e}");
    }

    let settings_path = default_settings_path();
    let mut settings = settings_path
        .as_ref()
        .map(Settings::load)
        .unwrap_or_default();
    if cli.apply_to(&mut settings)
        && let Some(path) = &settings_path
    {
        // Only the word length is remembered; other flags apply to this run.
        let mut stored = Settings::load(path);
        stored.word_length = settings.word_length;
        if let Err(e) = stored.save(path) {
            warn!("Failed to save settings: {e}");
        }
    }

    let words = match &cli.wordbank_path {
        Some(path) => match load_wordbank_from_file(path) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("Failed to load word bank from '{path}': {e}");
                std::process::exit(1);
            }
        },
        None => load_wordbank_from_str(EMBEDDED_WORDBANK),
    };

    let seen = open_seen_words();
    let mut supply: Box<dyn WordSupply> = if settings.debug_mode {
        Box::new(FixedWordSupply::default())
    } else if settings.load_from_seen_words {
        Box::new(SeenWordSupply::new(Rc::clone(&seen), thread_rng()))
    } else {
        Box::new(WordbankSupply::new(words.clone(), thread_rng()).with_seen_words(Rc::clone(&seen)))
    };
    let mut dictionary: Box<dyn Dictionary> = Box::new(
        WordbankDictionary::new(&words)
            .with_seen_words(seen)
            .enabled(settings.check_guess_validity),
    );

    let mut interface: Box<dyn GameInterface> = if cli.tui {
        match TuiInterface::new() {
            Ok(tui) => Box::new(tui),
            Err(e) => {
                eprintln!("Failed to start the terminal interface: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Box::new(CliInterface::new(io::stdin().lock()))
    };

    let result = game_loop(
        supply.as_mut(),
        dictionary.as_mut(),
        interface.as_mut(),
        &settings,
    );
    // Restore the terminal before printing anything
    drop(interface);

    if let Err(e) = result {
        error!("Game ended with an error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
