//! Cryptographic errors

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key or signature string has no recognised prefix
    #[error("unrecognised key format: {0}")]
    UnknownFormat(String),

    /// Base58 payload could not be decoded
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// Embedded checksum does not match the payload
    #[error("checksum mismatch in {0}")]
    ChecksumMismatch(String),

    /// Payload has the wrong size for its key type
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },

    /// Key type tag is unknown or unsupported for this operation
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Signing failed
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Invalid signature
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Recovery failed
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// Invalid private key
    #[error("invalid private key")]
    InvalidPrivateKey,
}
