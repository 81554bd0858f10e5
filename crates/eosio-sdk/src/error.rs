//! SDK error types

use eosio_abi::AbiError;
use eosio_crypto::CryptoError;
use eosio_primitives::{ChainId, Checksum256, Name, PrimitiveError};
use thiserror::Error;

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Serialization engine error
    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Key, signature or digest error
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Invalid name, asset, time or checksum
    #[error("Invalid value: {0}")]
    Primitive(#[from] PrimitiveError),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// JSON error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// No ABI for some action accounts
    #[error("Missing ABIs for {0:?}")]
    MissingAbis(Vec<Name>),

    /// Fetched ABI does not hash to the declared value
    #[error("ABI hash mismatch for {account}: declared {declared}, computed {computed}")]
    AbiHashMismatch {
        /// Contract account
        account: Name,
        /// Hash reported by the node
        declared: Checksum256,
        /// Hash of the bytes received
        computed: Checksum256,
    },

    /// Preset chain id differs from the node's
    #[error("Chain id mismatch: provided {provided}, node reports {node}")]
    ChainIdMismatch {
        /// Chain id set on the transaction
        provided: ChainId,
        /// Chain id reported by the node
        node: ChainId,
    },

    /// Action data still needs to be serialized
    #[error("Action {account}::{name} data is not serialized")]
    UnserializedAction {
        /// Contract account
        account: Name,
        /// Action name
        name: Name,
    },

    /// Signature provider failure
    #[error("Signature provider error: {0}")]
    SignatureProvider(String),

    /// Transaction must be signed first
    #[error("Transaction must be signed before broadcast")]
    NotSigned,
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<eosio_primitives::NameError> for SdkError {
    fn from(e: eosio_primitives::NameError) -> Self {
        SdkError::Primitive(e.into())
    }
}

impl From<eosio_primitives::AssetError> for SdkError {
    fn from(e: eosio_primitives::AssetError) -> Self {
        SdkError::Primitive(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        let err: SdkError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, SdkError::InvalidHex(_)));
        let err: SdkError = serde_json::from_str::<u8>("x").unwrap_err().into();
        assert!(matches!(err, SdkError::Serialization(_)));
        let err: SdkError = AbiError::UnknownType("x".into()).into();
        assert!(err.to_string().starts_with("ABI error"));
        let err: SdkError = Name::new("BAD").unwrap_err().into();
        assert!(matches!(err, SdkError::Primitive(_)));
    }

    #[test]
    fn test_display() {
        let err = SdkError::UnserializedAction {
            account: Name::new("eosio.token").unwrap(),
            name: Name::new("transfer").unwrap(),
        };
        assert_eq!(err.to_string(), "Action eosio.token::transfer data is not serialized");
    }
}
