//! # NPC Core
//!
//! Assembles what a non-player character knows into a prompt context and
//! keeps the character's dialogue history. Built on the session types of
//! `dialogue_state`.
//!
//! ## Core Components
//!
//! - **blocks**: Typed, prioritized knowledge fragments and the registry that rebuilds them
//! - **context**: Priority-ordered, bounded rendering of a character's blocks
//! - **memory**: JSON-file store of completed sessions per character
//! - **character**: One context plus at most one active session, and the reply seam
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Identical blocks and timestamps always render identical text
//! - **Transport-free**: Producing a reply is delegated to a [`Responder`]
//! - **Extensible**: New block types are registered without touching the core

pub mod blocks;
pub mod character;
pub mod config;
pub mod context;
pub mod error;
pub mod memory;

pub use blocks::*;
pub use character::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use memory::*;

pub use dialogue_state;
pub use dialogue_state::{CharacterId, DialogueError, DialogueLine, DialogueSession, Timestamp};
