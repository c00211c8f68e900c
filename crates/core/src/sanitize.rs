//! Free-text sanitization and identifier validation.
//!
//! Every free-text field is HTML-escaped exactly once, immediately before
//! the write that persists it, so stored text is always safe for direct
//! embedding in markup. Reads never re-escape.

use crate::error::CoreError;

/// Escape `& < > " '` in a free-text field.
///
/// `&` is escaped first so already-produced entities are not double-escaped
/// within a single pass.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Substrings that are never allowed in usernames.
const BANNED_USERNAME_TOKENS: [&str; 4] = ["'", "\"", ";", "--"];

/// Reject usernames containing quote characters, semicolons, or SQL comment
/// markers. Parameterized queries make these harmless downstream, but the
/// original contract rejects them at validation time.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.trim().is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if BANNED_USERNAME_TOKENS.iter().any(|t| username.contains(t)) {
        return Err(CoreError::Validation(
            "Username contains disallowed characters".into(),
        ));
    }
    Ok(())
}

/// Validate a phone number: after stripping `+`, spaces, `-`, `(`, `)`, only
/// digits may remain. Empty phones are allowed (the field is optional).
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if phone.is_empty() {
        return Ok(());
    }
    let stripped: String = phone
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '(' | ')'))
        .collect();
    if stripped.is_empty() || !stripped.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation("Invalid phone number format".into()));
    }
    Ok(())
}
