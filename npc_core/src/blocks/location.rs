//! Where a character is and what lies nearby.

use dialogue_state::Timestamp;
use serde::Deserialize;
use serde_json::json;

use super::{BlockContent, BlockMeta, BlockRecord, ContextBlock};
use crate::error::Result;

/// Location knowledge of a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationBlock {
    current_location: String,
    nearby_locations: Vec<String>,
    meta: BlockMeta,
}

#[derive(Deserialize)]
struct LocationContent {
    current_location: String,
    nearby_locations: Vec<String>,
}

impl LocationBlock {
    pub const TYPE: &'static str = "location";
    pub const DEFAULT_PRIORITY: i32 = 2;

    /// Create a location block created now with the default priority.
    pub fn new(
        current_location: impl Into<String>,
        nearby_locations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            current_location: current_location.into(),
            nearby_locations: nearby_locations.into_iter().map(Into::into).collect(),
            meta: BlockMeta::new(Self::DEFAULT_PRIORITY),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.meta.priority = priority;
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.meta.created_at = dialogue_state::time::truncate(created_at);
        self
    }

    pub fn current_location(&self) -> &str {
        &self.current_location
    }

    pub fn nearby_locations(&self) -> &[String] {
        &self.nearby_locations
    }

    /// Human-readable summary of the location.
    pub fn description(&self) -> String {
        format!(
            "Currently at {} with {} nearby points of interest",
            self.current_location,
            self.nearby_locations.len()
        )
    }

    /// Rebuild a location block from its record.
    pub fn from_record(record: &BlockRecord) -> Result<Self> {
        let content: LocationContent = record.parse_content()?;
        Ok(Self {
            current_location: content.current_location,
            nearby_locations: content.nearby_locations,
            meta: BlockMeta::from_record(record, Self::DEFAULT_PRIORITY),
        })
    }

    pub(crate) fn boxed_from_record(record: &BlockRecord) -> Result<Box<dyn ContextBlock>> {
        Ok(Box::new(Self::from_record(record)?))
    }
}

impl ContextBlock for LocationBlock {
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
        content.insert("current_location".into(), json!(self.current_location));
        content.insert("nearby_locations".into(), json!(self.nearby_locations));
        content.insert("description".into(), json!(self.description()));
        content
    }
}
