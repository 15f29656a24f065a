//! Local participant identity.

use crate::shared::token;

/// The session's own identifier.
///
/// Generated lazily on the first successful location capture and stable
/// until the session ends; never persisted across runs. Uniqueness is not
/// verified against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    pub id: String,
}

impl LocalIdentity {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self {
            id: token::participant_token(),
        }
    }
}

impl std::fmt::Display for LocalIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
