//! The seam to whatever produces an NPC's reply (usually a language model).

/// Everything a reply collaborator needs to speak as a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest<'a> {
    /// Display name of the character being played.
    pub character_name: &'a str,

    /// Rendered context of the character.
    pub context: String,

    /// Transcript of the active session, including the latest player line.
    pub transcript: String,

    /// The line the character is replying to.
    pub player_input: &'a str,

    /// Upper bound on the reply length.
    pub max_reply_length: usize,
}

/// Produces a character's reply.
///
/// Implementations own transport, retries and any fallback text; the reply
/// they return is appended to the session verbatim.
pub trait Responder {
    fn respond(&self, request: &ReplyRequest<'_>) -> String;
}

impl<F> Responder for F
where
    F: Fn(&ReplyRequest<'_>) -> String,
{
    fn respond(&self, request: &ReplyRequest<'_>) -> String {
        self(request)
    }
}
