use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MAX_SESSION_KEY_LEN: usize = 128;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionKeyError {
    #[error("session key cannot be empty")]
    Empty,

    #[error("session key is too long: {len} bytes")]
    TooLong { len: usize },
}

/// Opaque identity of one player session.
///
/// Random-play history is stored per key; two keys never share a round.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionKey(String);

impl SessionKey {
    /// # Errors
    ///
    /// Returns `SessionKeyError` if the key is blank or longer than 128 bytes.
    pub fn new(raw: impl Into<String>) -> Result<Self, SessionKeyError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionKeyError::Empty);
        }
        if trimmed.len() > MAX_SESSION_KEY_LEN {
            return Err(SessionKeyError::TooLong { len: trimmed.len() });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionKey {
    type Error = SessionKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionKey> for String {
    fn from(key: SessionKey) -> Self {
        key.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionKey({:?})", self.0)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
