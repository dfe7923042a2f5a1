//! Payload shape checks and input ceilings.
//!
//! Messages are checked as they arrive in JSON (`serde_json::Value`) so a
//! wrong type gets the same answer as a missing field.

use serde_json::Value;

/// Longest accepted chat message, in characters after trimming.
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Longest accepted session id.
pub const MAX_SESSION_ID_LEN: usize = 100;

const SESSION_ID_SHAPE_LEN: usize = 36;

/// A rejected field, rendered as the 400 response's error string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Password is required")]
    PasswordRequired,

    #[error("Message is required")]
    MessageRequired,

    #[error("Message cannot be empty")]
    MessageEmpty,

    #[error("Message too long (max 4000 characters)")]
    MessageTooLong,

    #[error("Session ID is required")]
    SessionIdRequired,

    #[error("Invalid session ID")]
    SessionIdTooLong,

    #[error("Invalid session ID format")]
    SessionIdFormat,
}

/// A non-empty string password.
pub fn validate_password(password: Option<&Value>) -> Result<&str, InputError> {
    match password {
        Some(Value::String(password)) if !password.is_empty() => Ok(password),
        _ => Err(InputError::PasswordRequired),
    }
}

/// A string that is non-empty after trimming and at most [`MAX_MESSAGE_CHARS`].
/// Returns the message as sent (untrimmed).
pub fn validate_message(message: Option<&Value>) -> Result<&str, InputError> {
    let message = match message {
        Some(Value::String(message)) => message,
        _ => return Err(InputError::MessageRequired),
    };

    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(InputError::MessageEmpty);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(InputError::MessageTooLong);
    }
    Ok(message)
}

/// A string of at most [`MAX_SESSION_ID_LEN`] shaped like a UUID:
/// 36 characters of hex digits and hyphens.
pub fn validate_session_id(session_id: Option<&Value>) -> Result<&str, InputError> {
    let session_id = match session_id {
        Some(Value::String(id)) if !id.is_empty() => id,
        _ => return Err(InputError::SessionIdRequired),
    };

    if session_id.len() > MAX_SESSION_ID_LEN {
        return Err(InputError::SessionIdTooLong);
    }

    let shaped = session_id.len() == SESSION_ID_SHAPE_LEN
        && session_id.bytes().all(|b| b.is_ascii_hexdigit() || b == b'-');
    if !shaped {
        return Err(InputError::SessionIdFormat);
    }

    Ok(session_id)
}
