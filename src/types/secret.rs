//! Secret strings owned by the core configuration.
//!
//! Cryptographic collaborators borrow the value through [`Secret::expose`].
//! The bytes are wiped when the owning configuration is dropped.

use serde::Deserialize;
use std::fmt;
use zeroize::Zeroize;

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_redact() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{:?}", secret), "Secret(<redacted>)");
        assert_eq!(secret.to_string(), "<redacted>");
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_deserialize_transparent() {
        let secret: Secret = serde_json::from_str("\"salty\"").unwrap();
        assert_eq!(secret.expose(), "salty");
        assert_eq!(secret.len(), 5);
        assert!(Secret::default().is_empty());
    }
}
