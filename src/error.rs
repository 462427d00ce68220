/// All errors the game core and its collaborators can report.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A caller broke a precondition of the core (length mismatch,
    /// submitting on a finished game, ...). Never recovered from.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("invalid secret word: {0:?}")]
    InvalidSecretWord(String),

    #[error("no words of length {0} available")]
    NoWordsOfLength(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
