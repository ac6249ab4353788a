//! Lookup from block type to the constructor that rebuilds it from a record.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::{BlockRecord, ContextBlock, DialogueMemoryBlock, LocationBlock};
use crate::error::{Error, Result};

/// Rebuilds a concrete block from its serialized record.
pub type BlockConstructor = fn(&BlockRecord) -> Result<Box<dyn ContextBlock>>;

/// Maps each block type tag to its constructor.
#[derive(Clone)]
pub struct BlockRegistry {
    constructors: HashMap<String, BlockConstructor>,
}

impl BlockRegistry {
    /// Create a registry with no known block types.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a registry that knows the built-in block variants.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(LocationBlock::TYPE, LocationBlock::boxed_from_record);
        registry.register(DialogueMemoryBlock::TYPE, DialogueMemoryBlock::boxed_from_record);
        registry
    }

    /// Register a constructor, returning the one it replaced.
    pub fn register(
        &mut self,
        block_type: impl Into<String>,
        constructor: BlockConstructor,
    ) -> Option<BlockConstructor> {
        let block_type = block_type.into();
        debug!(block_type = %block_type, "block type registered");
        self.constructors.insert(block_type, constructor)
    }

    /// Check if a block type is known.
    pub fn contains(&self, block_type: &str) -> bool {
        self.constructors.contains_key(block_type)
    }

    /// Rebuild a block from a record, dispatching on its type tag.
    pub fn deserialize(&self, record: &BlockRecord) -> Result<Box<dyn ContextBlock>> {
        let constructor = self.constructors.get(&record.block_type).ok_or_else(|| {
            Error::Validation(format!("unknown block type `{}`", record.block_type))
        })?;
        constructor(record)
    }

    /// Parse and rebuild a block from raw JSON.
    pub fn deserialize_value(&self, value: Value) -> Result<Box<dyn ContextBlock>> {
        self.deserialize(&BlockRecord::from_value(value)?)
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.constructors.keys().collect();
        types.sort();
        f.debug_struct("BlockRegistry").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{BlockContent, RememberedDialogue};
    use dialogue_state::Timestamp;
    use serde_json::json;

    /// A caller-defined block type used to exercise registration.
    #[derive(Debug)]
    struct MoodBlock {
        mood: String,
        created_at: Timestamp,
    }

    impl ContextBlock for MoodBlock {
        fn block_type(&self) -> &str {
            "mood"
        }

        fn priority(&self) -> i32 {
            1
        }

        fn created_at(&self) -> Timestamp {
            self.created_at
        }

        fn render_content(&self) -> BlockContent {
            let mut content = BlockContent::new();
            content.insert("mood".into(), json!(self.mood));
            content
        }
    }

    fn mood_from_record(record: &BlockRecord) -> Result<Box<dyn ContextBlock>> {
        #[derive(serde::Deserialize)]
        struct Content {
            mood: String,
        }

        let content: Content = record.parse_content()?;
        Ok(Box::new(MoodBlock {
            mood: content.mood,
            created_at: dialogue_state::time::now(),
        }))
    }

    #[test]
    fn test_builtin_dispatch() {
        let registry = BlockRegistry::builtin();
        assert!(registry.contains("location"));
        assert!(registry.contains("dialogue_memory"));

        let memory = DialogueMemoryBlock::new([RememberedDialogue::new("Player1", ["Hello"])]);
        let restored = registry.deserialize(&memory.to_record()).unwrap();

        assert_eq!(restored.block_type(), "dialogue_memory");
        assert_eq!(restored.render_content(), memory.render_content());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = BlockRegistry::builtin()
            .deserialize_value(json!({ "type": "weather", "content": {} }))
            .unwrap_err();

        assert!(matches!(err, Error::Validation(message) if message.contains("weather")));
    }

    #[test]
    fn test_custom_block_type() {
        let mut registry = BlockRegistry::builtin();
        assert!(registry.register("mood", mood_from_record).is_none());

        let block = registry
            .deserialize_value(json!({ "type": "mood", "content": { "mood": "grumpy" } }))
            .unwrap();

        assert_eq!(block.block_type(), "mood");
        assert_eq!(block.render_content()["mood"], "grumpy");
    }

    #[test]
    fn test_empty_registry() {
        let registry = BlockRegistry::empty();
        assert!(!registry.contains("location"));
        assert_eq!(format!("{registry:?}"), "BlockRegistry { types: [] }");
    }
}
