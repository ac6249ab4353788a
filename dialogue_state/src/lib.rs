//! # Dialogue State
//!
//! The dialogue half of NPC Aid - character identities, timestamped
//! utterances and the open/closed session lifecycle. This crate holds no
//! rendering or storage logic; `npc_core` builds on top of it.

pub mod dialogue;
pub mod entities;
pub mod error;
pub mod time;

pub use dialogue::*;
pub use entities::*;
pub use error::*;
pub use time::Timestamp;
