//! Caller and holder identities.

use serde::{Deserialize, Serialize};

/// Length of an identity in bytes.
pub const IDENTITY_SIZE: usize = 20;

/// An opaque caller/holder identity.
///
/// The null identity (all zero bytes) is reserved: it stands for "no
/// holder" in issuance notifications and is rejected wherever an actual
/// holder is required.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Identity([u8; IDENTITY_SIZE]);

impl Identity {
    /// The reserved null identity.
    pub const NULL: Self = Self([0u8; IDENTITY_SIZE]);

    /// Creates an identity from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; IDENTITY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identity bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; IDENTITY_SIZE] {
        &self.0
    }

    /// Returns `true` for the reserved null identity.
    #[must_use]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_identity_is_detected() {
        assert!(Identity::NULL.is_null());
        assert!(Identity::from_bytes([0u8; IDENTITY_SIZE]).is_null());
        assert!(!Identity::from_bytes([1u8; IDENTITY_SIZE]).is_null());
    }

    #[test]
    fn display_renders_lowercase_hex() {
        let mut bytes = [0u8; IDENTITY_SIZE];
        bytes[0] = 0xAB;
        bytes[19] = 0x01;
        let rendered = Identity::from_bytes(bytes).to_string();
        assert_eq!(rendered.len(), IDENTITY_SIZE * 2);
        assert!(rendered.starts_with("ab"));
        assert!(rendered.ends_with("01"));
    }
}
