//! Canonical fixed-width name encoding
//!
//! Names are stored as 32-byte values: the UTF-8 bytes of the name followed
//! by zero padding. The empty name encodes to the all-zero value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum encoded length of a name in bytes
pub const MAX_NAME_BYTES: usize = 32;

/// Error type for name encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    /// Name does not fit the fixed-width encoding
    #[error("Name is {0} bytes, maximum is 32")]
    TooLong(usize),
}

/// Canonical 32-byte encoding of a registered name
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NameKey([u8; MAX_NAME_BYTES]);

impl NameKey {
    /// The encoding of the empty name
    pub const ZERO: NameKey = NameKey([0u8; MAX_NAME_BYTES]);

    /// Encode a name, right-padding with zeros
    pub fn encode(name: &str) -> Result<Self, NameError> {
        let bytes = name.as_bytes();
        if bytes.len() > MAX_NAME_BYTES {
            return Err(NameError::TooLong(bytes.len()));
        }

        let mut data = [0u8; MAX_NAME_BYTES];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(data))
    }

    /// Wrap an already-encoded value
    pub fn from_bytes(data: [u8; MAX_NAME_BYTES]) -> Self {
        Self(data)
    }

    /// Get the raw encoded bytes
    pub fn as_bytes(&self) -> &[u8; MAX_NAME_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; MAX_NAME_BYTES]
    }

    /// The name bytes with trailing zero padding stripped
    pub fn trimmed(&self) -> &[u8] {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        &self.0[..end]
    }

    /// Decode back to a string, lossily if the bytes are not valid UTF-8
    pub fn to_name(&self) -> String {
        String::from_utf8_lossy(self.trimmed()).into_owned()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for NameKey {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::encode(s)
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_name())
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameKey({:?})", self.to_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_with_zeros() {
        let key = NameKey::encode("hello").unwrap();
        assert_eq!(&key.as_bytes()[..5], b"hello");
        assert!(key.as_bytes()[5..].iter().all(|b| *b == 0));
        assert_eq!(key.to_name(), "hello");
    }

    #[test]
    fn test_empty_name_is_zero() {
        let key = NameKey::encode("").unwrap();
        assert!(key.is_zero());
        assert_eq!(key, NameKey::ZERO);
        assert_eq!(key.trimmed(), b"");
    }

    #[test]
    fn test_length_limit() {
        let exact = "a".repeat(32);
        assert!(NameKey::encode(&exact).is_ok());

        let long = "a".repeat(33);
        assert_eq!(NameKey::encode(&long), Err(NameError::TooLong(33)));

        // Multi-byte characters count by encoded length
        let wide = "é".repeat(17);
        assert_eq!(NameKey::encode(&wide), Err(NameError::TooLong(34)));
    }

    #[test]
    fn test_display_and_parse() {
        let key: NameKey = "vanity".parse().unwrap();
        assert_eq!(key.to_string(), "vanity");
        assert_eq!(format!("{:?}", key), "NameKey(\"vanity\")");
        assert!(key.to_hex().starts_with("76616e697479"));
    }
}
