//! # Secure Secret Type
//!
//! Wrapper for release secrets that zeroizes memory on drop.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 32-byte release secret that zeroizes on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecureSecret {
    inner: [u8; 32],
}

impl SecureSecret {
    /// Create a new secure secret from bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { inner: bytes }
    }

    /// Create from a slice (copies into fixed array).
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != 32 {
            return None;
        }
        let mut inner = [0u8; 32];
        inner.copy_from_slice(slice);
        Some(Self { inner })
    }

    /// Right-pad a short passphrase with zeros to 32 bytes.
    ///
    /// Returns `None` if the passphrase is longer than 32 bytes.
    pub fn from_passphrase(passphrase: &str) -> Option<Self> {
        let bytes = passphrase.as_bytes();
        if bytes.len() > 32 {
            return None;
        }
        let mut inner = [0u8; 32];
        inner[..bytes.len()].copy_from_slice(bytes);
        Some(Self { inner })
    }

    /// Get the secret bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.inner
    }

    /// All-zero secrets are never accepted.
    pub fn is_zero(&self) -> bool {
        self.inner.iter().all(|b| *b == 0)
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecureSecret(***)")
    }
}

impl Serialize for SecureSecret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&hex::encode(self.inner))
    }
}

impl<'de> Deserialize<'de> for SecureSecret {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).ok_or_else(|| serde::de::Error::custom("invalid secret length"))
    }
}
