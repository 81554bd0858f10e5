//! Fixed-size digest values (checksum160, checksum256, checksum512)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Checksum parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChecksumError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid checksum length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },
}

/// An `N`-byte digest, written to the wire as raw bytes and shown as hex
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum<const N: usize>([u8; N]);

/// 20-byte digest
pub type Checksum160 = Checksum<20>;
/// 32-byte digest (transaction ids, chain ids)
pub type Checksum256 = Checksum<32>;
/// 64-byte digest
pub type Checksum512 = Checksum<64>;

impl<const N: usize> Checksum<N> {
    /// Size in bytes
    pub const LEN: usize = N;

    /// All-zero value
    pub const ZERO: Self = Checksum([0u8; N]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; N]) -> Self {
        Checksum(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, ChecksumError> {
        let bytes: [u8; N] = slice.try_into().map_err(|_| ChecksumError::InvalidLength {
            expected: N,
            got: slice.len(),
        })?;
        Ok(Checksum(bytes))
    }

    /// Parse from hex, either case
    pub fn from_hex(s: &str) -> Result<Self, ChecksumError> {
        let bytes = hex::decode(s).map_err(|e| ChecksumError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Lowercase hex, no prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl<const N: usize> Default for Checksum<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> fmt::Debug for Checksum<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum{}({})", N * 8, self.to_hex())
    }
}

impl<const N: usize> fmt::Display for Checksum<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> FromStr for Checksum<N> {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl<const N: usize> From<[u8; N]> for Checksum<N> {
    fn from(bytes: [u8; N]) -> Self {
        Checksum(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for Checksum<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl<const N: usize> Serialize for Checksum<N> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de, const N: usize> Deserialize<'de> for Checksum<N> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Checksum::from_hex(&s).map_err(de::Error::custom)
        }
    }
}
