//! Participant Token Generator
//!
//! Short random identifiers for session participants.

use rand::Rng;

/// Prefix carried by every generated token.
const TOKEN_PREFIX: &str = "User-";

/// Number of random characters after the prefix.
const TOKEN_LENGTH: usize = 6;

/// Base-36 alphabet (lowercase).
const TOKEN_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a short participant token, e.g. `User-x3k9qa`.
///
/// Collisions are possible but accepted as negligible; the token is never
/// checked against the server.
pub fn participant_token() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..TOKEN_LENGTH)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect();
    format!("{}{}", TOKEN_PREFIX, suffix)
}
