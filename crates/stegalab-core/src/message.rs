use std::fmt;

use crate::error::SteganoError;
use crate::result::Result;

/// A text message as it is hidden in a carrier, always UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Message(String);

impl Message {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    /// Creates a message from unveiled bytes, which must be valid UTF-8.
    pub fn from_utf8(content: Vec<u8>) -> Result<Self> {
        String::from_utf8(content)
            .map(Self)
            .map_err(|e| SteganoError::CorruptFrame(format!("payload is not valid UTF-8: {e}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Message {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_count_bytes_not_chars() {
        let m = Message::from("Grüße");
        assert_eq!(m.len(), 7);
        assert_eq!(m.as_str(), "Grüße");
    }

    #[test]
    fn should_reject_invalid_utf8() {
        let result = Message::from_utf8(vec![0x48, 0xff, 0x49]);
        match result {
            Err(SteganoError::CorruptFrame(_)) => (),
            other => panic!("expected a corrupt frame, got {other:?}"),
        }
    }
}
