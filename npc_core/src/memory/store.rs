//! JSON-file backed memory store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dialogue_state::{CharacterId, DialogueSession};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::NpcConfig;
use crate::error::{Result, StorageError};

/// On-disk layout of the memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemoryDocument {
    #[serde(default)]
    past_sessions: BTreeMap<CharacterId, Vec<DialogueSession>>,
}

impl MemoryDocument {
    /// Every session must sit under its own subject's key.
    fn check_subjects(&self) -> std::result::Result<(), serde_json::Error> {
        for (key, sessions) in &self.past_sessions {
            if let Some(session) = sessions.iter().find(|s| s.subject_id() != key) {
                return Err(serde::de::Error::custom(format!(
                    "session for `{}` stored under `{key}`",
                    session.subject_id()
                )));
            }
        }
        Ok(())
    }
}

/// Stores and retrieves past dialogue sessions per character.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: PathBuf,
    document: MemoryDocument,
}

impl MemoryStore {
    /// Create an empty store backed by `path`. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: MemoryDocument::default(),
        }
    }

    /// Create a store and load whatever history already exists at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Open the store configured by `memory_path`.
    pub fn from_config(config: &NpcConfig) -> Result<Self> {
        Self::open(config.memory_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reload the in-memory mapping from the backing file.
    ///
    /// A missing file is the normal first-run state and leaves the mapping
    /// empty. A file that exists but cannot be read is a `Read` error; one
    /// whose content is not a valid document is `Corrupt`.
    pub fn load(&mut self) -> Result<()> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "memory store not found, starting empty");
                self.document = MemoryDocument::default();
                return Ok(());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        let corrupt = |source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        };
        let document: MemoryDocument = serde_json::from_slice(&raw).map_err(corrupt)?;
        document.check_subjects().map_err(corrupt)?;
        self.document = document;

        info!(
            path = %self.path.display(),
            subjects = self.document.past_sessions.len(),
            "memory store loaded"
        );
        Ok(())
    }

    /// Append a session to its character's history and rewrite the file.
    ///
    /// Callers are expected to close the session first; an open session is
    /// stored as-is.
    pub fn save_session(&mut self, session: DialogueSession) -> Result<()> {
        if session.is_active() {
            warn!(subject = %session.subject_id(), "saving a dialogue session that is still open");
        }

        let subject = session.subject_id().clone();
        self.document
            .past_sessions
            .entry(subject.clone())
            .or_default()
            .push(session);

        debug!(subject = %subject, "dialogue session stored");
        self.persist()
    }

    /// Past sessions of a character, most recently started first.
    ///
    /// Unknown characters have no history and yield an empty list.
    pub fn sessions_for(
        &self,
        subject_id: &CharacterId,
        limit: Option<usize>,
    ) -> Vec<&DialogueSession> {
        let mut sessions: Vec<_> = self
            .document
            .past_sessions
            .get(subject_id)
            .map(|sessions| sessions.iter().collect())
            .unwrap_or_default();

        sessions.sort_by(|a, b| b.started_at().cmp(&a.started_at()));
        if let Some(limit) = limit {
            sessions.truncate(limit);
        }
        sessions
    }

    /// Characters with stored history.
    pub fn subjects(&self) -> impl Iterator<Item = &CharacterId> {
        self.document.past_sessions.keys()
    }

    /// Number of sessions stored for a character.
    pub fn session_count(&self, subject_id: &CharacterId) -> usize {
        self.document
            .past_sessions
            .get(subject_id)
            .map_or(0, Vec::len)
    }

    /// Write the whole store to the backing file.
    fn persist(&self) -> Result<()> {
        let content =
            serde_json::to_string_pretty(&self.document).map_err(StorageError::Encode)?;

        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, content).map_err(write_err)?;

        info!(path = %self.path.display(), "memory store saved");
        Ok(())
    }
}
