//! Username rules - the account naming policy
//!
//! A username doubles as the public inbox address (`/u/{username}`), so the
//! accepted alphabet is deliberately small: ASCII letters, digits, underscore,
//! and dot, with dots never leading, trailing, or doubled.

/// Minimum username length in characters.
pub const USERNAME_MIN_CHARS: usize = 3;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 16;

/// Check a candidate username against the naming policy.
///
/// Rules: 3 to 16 characters; ASCII letters, digits, underscore, or dot; the
/// first character must not be a dot; no consecutive dots; no trailing dot.
pub fn is_valid_username(candidate: &str) -> bool {
    if candidate.len() < USERNAME_MIN_CHARS || candidate.len() > USERNAME_MAX_CHARS {
        return false;
    }

    let mut prev_was_dot = false;
    for (i, ch) in candidate.chars().enumerate() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => prev_was_dot = false,
            '.' => {
                if i == 0 || prev_was_dot {
                    return false;
                }
                prev_was_dot = true;
            }
            _ => return false,
        }
    }

    !prev_was_dot
}
