//! Memory module - durable history of completed dialogue sessions.
//!
//! The store keeps every saved session per character in memory and mirrors
//! the whole mapping to a single JSON document:
//!
//! ```json
//! { "pastSessions": { "<subjectId>": [ { "subjectId": "...", "lines": [...], ... } ] } }
//! ```
//!
//! Each save rewrites the entire document. Hosts that end sessions for many
//! characters concurrently must serialize access to the store (one
//! `Mutex<MemoryStore>` or a single writer).

mod store;

pub use store::*;
