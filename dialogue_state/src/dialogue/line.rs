//! A single utterance within a dialogue.

use serde::{Deserialize, Serialize};

use crate::time::{self, Timestamp};

/// One timestamped line of dialogue. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    speaker: String,
    text: String,
    #[serde(with = "crate::time::iso_millis")]
    timestamp: Timestamp,
}

impl DialogueLine {
    /// Create a line spoken now.
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self::at(speaker, text, time::now())
    }

    /// Create a line with an explicit timestamp.
    pub fn at(speaker: impl Into<String>, text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            timestamp: time::truncate(timestamp),
        }
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl std::fmt::Display for DialogueLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}
