//! Dialogue session lifecycle.
//!
//! A session starts **open** and accepts lines until it is closed. Closing is
//! terminal: the first close fixes `ended_at` and later calls are no-ops.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::DialogueLine;
use crate::entities::CharacterId;
use crate::error::DialogueError;
use crate::time::{self, Timestamp};

/// An ordered exchange of lines with one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueSession {
    subject_id: CharacterId,
    opening_prompt: String,
    lines: Vec<DialogueLine>,
    #[serde(with = "crate::time::iso_millis")]
    started_at: Timestamp,
    #[serde(default, with = "crate::time::iso_millis_option")]
    ended_at: Option<Timestamp>,
}

impl DialogueSession {
    /// Open a new session starting now.
    pub fn new(subject_id: CharacterId, opening_prompt: impl Into<String>) -> Self {
        Self::opened_at(subject_id, opening_prompt, time::now())
    }

    /// Open a new session with an explicit start time.
    pub fn opened_at(
        subject_id: CharacterId,
        opening_prompt: impl Into<String>,
        started_at: Timestamp,
    ) -> Self {
        let session = Self {
            subject_id,
            opening_prompt: opening_prompt.into(),
            lines: Vec::new(),
            started_at: time::truncate(started_at),
            ended_at: None,
        };
        info!(subject = %session.subject_id, "dialogue session opened");
        session
    }

    /// Append a line spoken now.
    pub fn append_line(
        &mut self,
        speaker: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<&DialogueLine, DialogueError> {
        self.append(DialogueLine::new(speaker, text))
    }

    /// Append an already constructed line.
    ///
    /// Fails with [`DialogueError::SessionClosed`] once the session has ended;
    /// the line sequence is left untouched in that case.
    pub fn append(&mut self, line: DialogueLine) -> Result<&DialogueLine, DialogueError> {
        if !self.is_active() {
            return Err(DialogueError::SessionClosed {
                subject: self.subject_id.clone(),
            });
        }

        debug!(subject = %self.subject_id, speaker = line.speaker(), "dialogue line appended");
        self.lines.push(line);
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Close the session now. Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        self.close_at(time::now())
    }

    /// Close the session at an explicit time. The first close wins.
    pub fn close_at(&mut self, ended_at: Timestamp) -> bool {
        if self.ended_at.is_some() {
            return false;
        }

        self.ended_at = Some(time::truncate(ended_at));
        info!(subject = %self.subject_id, lines = self.lines.len(), "dialogue session closed");
        true
    }

    /// Check if the session still accepts lines.
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Render all lines as `speaker: text`, one per line, in append order.
    pub fn transcript(&self) -> String {
        self.lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn subject_id(&self) -> &CharacterId {
        &self.subject_id
    }

    pub fn opening_prompt(&self) -> &str {
        &self.opening_prompt
    }

    pub fn lines(&self) -> &[DialogueLine] {
        &self.lines
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Timestamp> {
        self.ended_at
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialize to the persisted record form.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild a session from its persisted record form.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(millis: i64) -> Timestamp {
        time::from_millis(millis).unwrap()
    }

    fn session() -> DialogueSession {
        DialogueSession::opened_at(CharacterId::new("1"), "Greet the traveller", ts(1_000))
    }

    #[test]
    fn test_transcript() {
        let mut dialogue = session();
        dialogue.append_line("A", "hi").unwrap();
        dialogue.append_line("B", "hello").unwrap();

        assert_eq!(dialogue.transcript(), "A: hi\nB: hello");
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(session().transcript(), "");
        assert!(session().is_empty());
    }

    #[test]
    fn test_append_after_close_is_rejected() {
        let mut dialogue = session();
        dialogue.append_line("A", "hi").unwrap();
        assert!(dialogue.close());

        let err = dialogue.append_line("B", "too late").unwrap_err();
        assert_eq!(
            err,
            DialogueError::SessionClosed {
                subject: CharacterId::new("1")
            }
        );
        assert_eq!(dialogue.len(), 1);
        assert_eq!(dialogue.transcript(), "A: hi");
    }

    #[test]
    fn test_first_close_wins() {
        let mut dialogue = session();
        assert!(dialogue.is_active());

        assert!(dialogue.close_at(ts(5_000)));
        assert!(!dialogue.close_at(ts(9_000)));

        assert!(!dialogue.is_active());
        assert_eq!(dialogue.ended_at(), Some(ts(5_000)));
    }

    #[test]
    fn test_wire_format() {
        let mut dialogue = session();
        dialogue.append(DialogueLine::at("A", "hi", ts(2_000))).unwrap();

        let value = dialogue.to_value().unwrap();
        assert_eq!(value["subjectId"], "1");
        assert_eq!(value["openingPrompt"], "Greet the traveller");
        assert_eq!(value["startedAt"], "1970-01-01T00:00:01.000Z");
        assert_eq!(value["endedAt"], serde_json::Value::Null);
        assert_eq!(value["lines"][0]["timestamp"], "1970-01-01T00:00:02.000Z");
    }

    #[test]
    fn test_round_trip_without_lines() {
        let mut dialogue = session();
        dialogue.close_at(ts(3_000));

        let restored = DialogueSession::from_value(dialogue.to_value().unwrap()).unwrap();
        assert_eq!(restored, dialogue);
    }

    #[test]
    fn test_round_trip_with_lines() {
        let mut dialogue = DialogueSession::new(CharacterId::new("1"), "");
        dialogue.append_line("Warrior", "Can you sharpen my sword?").unwrap();
        dialogue.append_line("Ivan", "For two silver, aye.").unwrap();
        dialogue.close();

        let value = dialogue.to_value().unwrap();
        let restored = DialogueSession::from_value(value.clone()).unwrap();

        assert_eq!(restored, dialogue);
        assert_eq!(restored.to_value().unwrap(), value);
    }

    #[test]
    fn test_missing_end_time_means_active() {
        let restored = DialogueSession::from_value(serde_json::json!({
            "subjectId": "7",
            "openingPrompt": "",
            "lines": [],
            "startedAt": "2024-05-01T12:00:00.000Z"
        }))
        .unwrap();

        assert!(restored.is_active());
        assert_eq!(restored.subject_id().as_str(), "7");
    }
}
