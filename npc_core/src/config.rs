//! Runtime configuration, read from TOML.
//!
//! ```toml
//! memory_path = "data/npc_memory.json"
//! max_context_blocks = 8
//! recall_limit = 3
//! ```
//!
//! Every key is optional and falls back to [`NpcConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Configuration shared by the memory store and character glue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    /// Backing file for the memory store.
    pub memory_path: PathBuf,

    /// Maximum number of context blocks rendered into a prompt (`None` = all).
    pub max_context_blocks: Option<usize>,

    /// How many past sessions are folded into a dialogue memory block.
    pub recall_limit: usize,

    /// Key points kept per remembered session.
    pub max_key_points: usize,

    /// Reply length bound handed to the reply collaborator.
    pub max_reply_length: usize,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            memory_path: PathBuf::from("npc_memory.json"),
            max_context_blocks: None,
            recall_limit: 5,
            max_key_points: 5,
            max_reply_length: 150,
        }
    }
}

impl NpcConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = NpcConfig::from_toml_str("").unwrap();
        assert_eq!(config, NpcConfig::default());
        assert_eq!(config.memory_path, PathBuf::from("npc_memory.json"));
        assert_eq!(config.max_context_blocks, None);
    }

    #[test]
    fn test_partial_document() {
        let config = NpcConfig::from_toml_str(
            r#"
            memory_path = "data/memory.json"
            max_context_blocks = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.memory_path, PathBuf::from("data/memory.json"));
        assert_eq!(config.max_context_blocks, Some(4));
        assert_eq!(config.recall_limit, 5);
        assert_eq!(config.max_reply_length, 150);
    }

    #[test]
    fn test_malformed_document() {
        let err = NpcConfig::from_toml_str("recall_limit = \"many\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("npc.toml");
        std::fs::write(&path, "recall_limit = 2\nmax_key_points = 1\n").unwrap();

        let config = NpcConfig::load(&path).unwrap();
        assert_eq!(config.recall_limit, 2);
        assert_eq!(config.max_key_points, 1);

        assert!(NpcConfig::load(dir.path().join("missing.toml")).is_err());
    }
}
