/// Errors surfaced by the experiment core.
///
/// Misuse of the API (unknown items, an item compared against itself) is a
/// programming error and panics instead of showing up here.
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Fewer than two items to compare.
    #[error("need at least 2 items to compare, got {found}")]
    InsufficientItems { found: usize },

    /// The item source listed the same identifier twice.
    #[error("duplicate item: {0}")]
    DuplicateItem(String),

    /// A round was requested after the session finished.
    #[error("session already finished")]
    SessionFinished,
}

pub type Result<T> = std::result::Result<T, Error>;
