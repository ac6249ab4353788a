//! Context - the prioritized collection of blocks describing a character.
//!
//! Rendering works as follows:
//! 1. **Ranking**: stable sort by priority (descending), then creation time
//!    (most recent first); remaining ties keep insertion order
//! 2. **Bounding**: keep the first `max_blocks` ranked blocks
//! 3. **Formatting**: each block becomes `"<BLOCK_TYPE>: <json content>"`
//! 4. **Joining**: segments are separated by a blank line
//!
//! Identical blocks with identical timestamps always render byte-identical
//! output.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

use crate::blocks::{BlockRecord, BlockRegistry, ContextBlock};
use crate::error::Result;

/// Separator placed between rendered block segments.
pub const SEGMENT_SEPARATOR: &str = "\n\n";

/// Ordered collection of the blocks a character knows.
#[derive(Debug, Default)]
pub struct Context {
    blocks: Vec<Box<dyn ContextBlock>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block. Blocks of the same type may coexist.
    pub fn add_block(&mut self, block: impl ContextBlock + 'static) {
        self.add_boxed(Box::new(block));
    }

    /// Add an already boxed block (e.g. one produced by a [`BlockRegistry`]).
    pub fn add_boxed(&mut self, block: Box<dyn ContextBlock>) {
        debug!(
            block_type = block.block_type(),
            priority = block.priority(),
            "context block added"
        );
        self.blocks.push(block);
    }

    /// Builder-style [`Context::add_block`].
    pub fn with_block(mut self, block: impl ContextBlock + 'static) -> Self {
        self.add_block(block);
        self
    }

    /// Remove every block of the given type. Returns how many were removed.
    pub fn remove_blocks_of_type(&mut self, block_type: &str) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.block_type() != block_type);

        let removed = before - self.blocks.len();
        if removed > 0 {
            debug!(block_type, removed, "context blocks removed");
        }
        removed
    }

    /// Get all blocks of a type, in insertion order.
    pub fn blocks_of_type(&self, block_type: &str) -> Vec<&dyn ContextBlock> {
        self.blocks
            .iter()
            .filter(|b| b.block_type() == block_type)
            .map(|b| b.as_ref())
            .collect()
    }

    /// All blocks in render order.
    pub fn ranked(&self) -> Vec<&dyn ContextBlock> {
        let mut ranked: Vec<_> = self.blocks.iter().map(|b| b.as_ref()).collect();
        ranked.sort_by(|a, b| render_order(*a, *b));
        ranked
    }

    /// Render the context string handed to the prompt builder.
    ///
    /// `max_blocks` keeps only the highest-ranked prefix; an empty context
    /// renders to an empty string.
    pub fn render(&self, max_blocks: Option<usize>) -> String {
        let ranked = self.ranked();
        let limit = max_blocks.unwrap_or(ranked.len());

        let segments: Vec<_> = ranked.into_iter().take(limit).map(render_segment).collect();
        debug!(
            total = self.blocks.len(),
            rendered = segments.len(),
            "context rendered"
        );
        segments.join(SEGMENT_SEPARATOR)
    }

    /// Iterate over all blocks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ContextBlock> {
        self.blocks.iter().map(|b| b.as_ref())
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize every block, in insertion order.
    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(|b| b.to_record()).collect()
    }

    /// Rebuild a context from serialized blocks.
    pub fn from_records(
        registry: &BlockRegistry,
        records: impl IntoIterator<Item = BlockRecord>,
    ) -> Result<Self> {
        let mut context = Self::new();
        for record in records {
            context.add_boxed(registry.deserialize(&record)?);
        }
        Ok(context)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// Priority descending, then creation time descending.
fn render_order(a: &dyn ContextBlock, b: &dyn ContextBlock) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

fn render_segment(block: &dyn ContextBlock) -> String {
    format!(
        "{}: {}",
        block.block_type().to_uppercase(),
        Value::Object(block.render_content())
    )
}
