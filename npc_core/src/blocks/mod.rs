//! Context blocks - typed, prioritized fragments of what a character knows.
//!
//! A block is defined by:
//! - **block type**: a stable discriminant (`location`, `dialogue_memory`, ...)
//!   used for rendering labels, lookup and removal
//! - **priority**: higher renders first
//! - **content**: a structured map produced on demand by [`ContextBlock::render_content`]
//!
//! Blocks are immutable once built; changing what a character knows means
//! removing a block and adding a new one.

mod dialogue_memory;
mod location;
mod registry;

pub use dialogue_memory::*;
pub use location::*;
pub use registry::*;

use dialogue_state::time::{self, Timestamp};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Structured content of a block, each field individually addressable.
pub type BlockContent = Map<String, Value>;

/// Capability shared by every block variant.
pub trait ContextBlock: std::fmt::Debug + Send + Sync {
    /// Stable type tag of the variant.
    fn block_type(&self) -> &str;

    fn priority(&self) -> i32;

    fn created_at(&self) -> Timestamp;

    /// Produce the block's structured content. Pure and total.
    fn render_content(&self) -> BlockContent;

    /// Serialize into the persisted record form.
    fn to_record(&self) -> BlockRecord {
        BlockRecord {
            block_type: self.block_type().to_string(),
            content: Some(self.render_content()),
            priority: Some(self.priority()),
            created_at: Some(self.created_at()),
        }
    }
}

/// Priority and creation time carried by every block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMeta {
    pub priority: i32,
    pub created_at: Timestamp,
}

impl BlockMeta {
    /// Metadata for a block created now.
    pub fn new(priority: i32) -> Self {
        Self {
            priority,
            created_at: time::now(),
        }
    }

    /// Recover metadata from a record, falling back to the variant default.
    pub fn from_record(record: &BlockRecord, default_priority: i32) -> Self {
        Self {
            priority: record.priority.unwrap_or(default_priority),
            created_at: record.created_at.unwrap_or_else(time::now),
        }
    }
}

/// Serialized block: `{ "type", "content", "priority", "createdAt" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "dialogue_state::time::iso_millis_option"
    )]
    pub created_at: Option<Timestamp>,
}

impl BlockRecord {
    /// Parse a record from arbitrary JSON.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("malformed block record: {e}")))
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| Error::Validation(format!("unencodable block record: {e}")))
    }

    /// Decode the content map into a variant's typed fields.
    pub fn parse_content<T: DeserializeOwned>(&self) -> Result<T> {
        let content = self.content.as_ref().ok_or_else(|| {
            Error::Validation(format!("`{}` block record has no content", self.block_type))
        })?;

        serde_json::from_value(Value::Object(content.clone())).map_err(|e| {
            Error::Validation(format!("invalid `{}` block content: {e}", self.block_type))
        })
    }
}
