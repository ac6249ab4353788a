//! Error types for npc_core.

use std::path::PathBuf;

use dialogue_state::DialogueError;
use thiserror::Error;

/// Result type alias using the npc_core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by context, memory and character operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A record is missing a required field or carries ill-typed data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A character-level lifecycle rule was violated.
    #[error("state error: {0}")]
    State(String),

    /// A dialogue session rejected a mutation.
    #[error(transparent)]
    Dialogue(#[from] DialogueError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("config error: {0}")]
    Config(String),
}

/// Failures of the memory store's backing file.
///
/// A file that does not exist yet is not an error; these cover a file that is
/// present but cannot be used.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read memory store {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("memory store {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode memory store: {0}")]
    Encode(serde_json::Error),

    #[error("failed to write memory store {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
