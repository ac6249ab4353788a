//! Errors raised by dialogue state transitions.

use thiserror::Error;

use crate::entities::CharacterId;

/// A lifecycle rule of a dialogue session was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    #[error("dialogue session for {subject} is closed and accepts no further lines")]
    SessionClosed { subject: CharacterId },
}
