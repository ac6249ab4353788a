//! Characters - one context plus at most one active dialogue session.

mod responder;

pub use responder::*;

use dialogue_state::{CharacterId, DialogueSession};
use tracing::info;

use crate::blocks::DialogueMemoryBlock;
use crate::config::NpcConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::memory::MemoryStore;

/// A non-player character with its knowledge and current conversation.
#[derive(Debug)]
pub struct Character {
    id: CharacterId,
    name: String,
    context: Context,
    dialogue: Option<DialogueSession>,
}

impl Character {
    /// Create a character with an empty context.
    pub fn new(id: impl Into<CharacterId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            context: Context::new(),
            dialogue: None,
        }
    }

    /// Replace the character's context.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }

    pub fn id(&self) -> &CharacterId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// The session currently held by the character, if any.
    pub fn dialogue(&self) -> Option<&DialogueSession> {
        self.dialogue.as_ref()
    }

    pub fn dialogue_mut(&mut self) -> Option<&mut DialogueSession> {
        self.dialogue.as_mut()
    }

    /// Check if the character is in an open conversation.
    pub fn in_dialogue(&self) -> bool {
        self.dialogue.as_ref().is_some_and(DialogueSession::is_active)
    }

    /// Open a new session.
    ///
    /// Fails with [`Error::State`] while another session is still open; a
    /// closed session left in the slot is discarded.
    pub fn open_session(&mut self, opening_prompt: impl Into<String>) -> Result<&mut DialogueSession> {
        if self.in_dialogue() {
            return Err(Error::State(format!(
                "character {} already has an open dialogue session",
                self.id
            )));
        }

        Ok(self
            .dialogue
            .insert(DialogueSession::new(self.id.clone(), opening_prompt)))
    }

    /// Close the held session and hand it back.
    pub fn close_session(&mut self) -> Option<DialogueSession> {
        let mut session = self.dialogue.take()?;
        session.close();
        Some(session)
    }

    /// Close the held session and append it to the memory store.
    ///
    /// Returns `false` if there was no session to archive.
    pub fn archive_session(&mut self, store: &mut MemoryStore) -> Result<bool> {
        match self.close_session() {
            Some(session) => {
                store.save_session(session)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replace dialogue memory blocks with a summary of stored history.
    ///
    /// Returns the number of sessions remembered. Without stored history the
    /// context is left untouched.
    pub fn recall(&mut self, store: &MemoryStore, limit: Option<usize>, max_points: usize) -> usize {
        let sessions = store.sessions_for(&self.id, limit);
        if sessions.is_empty() {
            return 0;
        }

        self.context.remove_blocks_of_type(DialogueMemoryBlock::TYPE);
        self.context.add_block(DialogueMemoryBlock::from_sessions(
            sessions.iter().copied(),
            &self.name,
            max_points,
        ));

        info!(character = %self.id, sessions = sessions.len(), "dialogue history recalled");
        sessions.len()
    }

    /// Run one conversational turn.
    ///
    /// Opens a session if none is active, appends the player's line, asks the
    /// responder for a reply, appends the reply under the character's name and
    /// returns it.
    pub fn converse(
        &mut self,
        responder: &dyn Responder,
        player_name: &str,
        player_input: &str,
        config: &NpcConfig,
    ) -> Result<String> {
        if !self.in_dialogue() {
            let prompt = format!("{} engages in conversation with {}", self.id, player_name);
            self.open_session(prompt)?;
        }

        let session = self
            .dialogue
            .as_mut()
            .ok_or_else(|| Error::State(format!("character {} has no dialogue session", self.id)))?;
        session.append_line(player_name, player_input)?;

        let request = ReplyRequest {
            character_name: &self.name,
            context: self.context.render(config.max_context_blocks),
            transcript: session.transcript(),
            player_input,
            max_reply_length: config.max_reply_length,
        };
        let reply = responder.respond(&request);

        session.append_line(self.name.clone(), reply.clone())?;
        Ok(reply)
    }
}
