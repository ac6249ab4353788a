//! Dialogue sessions - ordered utterances with an open/closed lifecycle.

mod line;
mod session;

pub use line::*;
pub use session::*;
