//! Memories of past conversations.

use dialogue_state::{DialogueSession, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{BlockContent, BlockMeta, BlockRecord, ContextBlock};
use crate::error::Result;

/// Partner name used when a conversation has no identifiable other speaker.
pub const UNKNOWN_PARTNER: &str = "unknown";

/// Key points remembered from one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedDialogue {
    /// Who the conversation was with.
    #[serde(default = "unknown_partner")]
    pub with: String,

    #[serde(default, rename = "points")]
    pub key_points: Vec<String>,
}

fn unknown_partner() -> String {
    UNKNOWN_PARTNER.to_string()
}

impl RememberedDialogue {
    pub fn new(
        with: impl Into<String>,
        key_points: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            with: with.into(),
            key_points: key_points.into_iter().map(Into::into).collect(),
        }
    }

    /// Summarize a stored session from the point of view of `own_name`.
    ///
    /// The partner is the first speaker that is not the character itself; the
    /// key points are the first `max_points` things the others said.
    pub fn from_session(session: &DialogueSession, own_name: &str, max_points: usize) -> Self {
        let mut others = session
            .lines()
            .iter()
            .filter(|line| line.speaker() != own_name)
            .peekable();

        let with = others
            .peek()
            .map(|line| line.speaker().to_string())
            .unwrap_or_else(unknown_partner);

        Self {
            with,
            key_points: others
                .take(max_points)
                .map(|line| line.text().to_string())
                .collect(),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "with": self.with,
            "points": self.key_points,
        })
    }
}

/// Block summarizing previous conversations of a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueMemoryBlock {
    dialogues: Vec<RememberedDialogue>,
    meta: BlockMeta,
}

#[derive(Deserialize)]
struct DialogueMemoryContent {
    key_points: Vec<RememberedDialogue>,
}

impl DialogueMemoryBlock {
    pub const TYPE: &'static str = "dialogue_memory";
    pub const DEFAULT_PRIORITY: i32 = 3;

    pub fn new(dialogues: impl IntoIterator<Item = RememberedDialogue>) -> Self {
        Self {
            dialogues: dialogues.into_iter().collect(),
            meta: BlockMeta::new(Self::DEFAULT_PRIORITY),
        }
    }

    /// Fold stored sessions (most recent first) into a memory block.
    pub fn from_sessions<'a>(
        sessions: impl IntoIterator<Item = &'a DialogueSession>,
        own_name: &str,
        max_points: usize,
    ) -> Self {
        Self::new(
            sessions
                .into_iter()
                .map(|session| RememberedDialogue::from_session(session, own_name, max_points)),
        )
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.meta.priority = priority;
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.meta.created_at = dialogue_state::time::truncate(created_at);
        self
    }

    pub fn dialogues(&self) -> &[RememberedDialogue] {
        &self.dialogues
    }

    pub fn summary(&self) -> String {
        format!("Memories of {} past conversations", self.dialogues.len())
    }

    /// Rebuild a memory block from its record.
    pub fn from_record(record: &BlockRecord) -> Result<Self> {
        let content: DialogueMemoryContent = record.parse_content()?;
        Ok(Self {
            dialogues: content.key_points,
            meta: BlockMeta::from_record(record, Self::DEFAULT_PRIORITY),
        })
    }

    pub(crate) fn boxed_from_record(record: &BlockRecord) -> Result<Box<dyn ContextBlock>> {
        Ok(Box::new(Self::from_record(record)?))
    }
}

impl ContextBlock for DialogueMemoryBlock {
    fn block_type(&self) -> &str {
        Self::TYPE
    }

    fn priority(&self) -> i32 {
        self.meta.priority
    }

    fn created_at(&self) -> Timestamp {
        self.meta.created_at
    }

    fn render_content(&self) -> BlockContent {
        let mut content = BlockContent::new();
        content.insert("summary".into(), json!(self.summary()));
        content.insert(
            "key_points".into(),
            Value::Array(self.dialogues.iter().map(RememberedDialogue::to_value).collect()),
        );
        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogue_state::CharacterId;

    fn rebellion() -> DialogueMemoryBlock {
        DialogueMemoryBlock::new([RememberedDialogue::new(
            "Player1",
            ["Asked about the king", "Mentioned the secret rebellion"],
        )])
    }

    #[test]
    fn test_memory_content() {
        let content = rebellion().render_content();

        assert_eq!(content["summary"], "Memories of 1 past conversations");
        assert_eq!(
            content["key_points"],
            json!([{
                "with": "Player1",
                "points": ["Asked about the king", "Mentioned the secret rebellion"]
            }])
        );
    }

    #[test]
    fn test_memory_round_trip() {
        let block = rebellion();
        let restored = DialogueMemoryBlock::from_record(&block.to_record()).unwrap();

        assert_eq!(restored.render_content(), block.render_content());
        assert_eq!(restored.priority(), DialogueMemoryBlock::DEFAULT_PRIORITY);
    }

    #[test]
    fn test_memory_partner_defaults_to_unknown() {
        let record = BlockRecord::from_value(json!({
            "type": "dialogue_memory",
            "content": { "key_points": [{ "points": ["Paid in gold"] }] }
        }))
        .unwrap();

        let block = DialogueMemoryBlock::from_record(&record).unwrap();
        assert_eq!(block.dialogues()[0].with, UNKNOWN_PARTNER);
        assert_eq!(block.dialogues()[0].key_points, vec!["Paid in gold"]);
    }

    #[test]
    fn test_from_sessions() {
        let mut session = DialogueSession::new(CharacterId::new("1"), "");
        session.append_line("Warrior", "Can you sharpen my sword?").unwrap();
        session.append_line("Ivan", "Aye.").unwrap();
        session.append_line("Warrior", "How much?").unwrap();
        session.append_line("Warrior", "Too much.").unwrap();
        session.close();

        let silent = DialogueSession::new(CharacterId::new("1"), "");

        let block = DialogueMemoryBlock::from_sessions([&session, &silent], "Ivan", 2);

        assert_eq!(
            block.dialogues(),
            &[
                RememberedDialogue::new("Warrior", ["Can you sharpen my sword?", "How much?"]),
                RememberedDialogue::new(UNKNOWN_PARTNER, Vec::<String>::new()),
            ]
        );
        assert_eq!(block.summary(), "Memories of 2 past conversations");
    }
}
