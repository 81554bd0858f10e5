//! ABI error types

use eosio_primitives::Name;
use thiserror::Error;

/// Broad category of an [`AbiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The ABI document itself is malformed or inconsistent
    Schema,
    /// A type, contract or action could not be found
    Resolution,
    /// A JSON value does not fit its type
    Encode,
    /// Binary data does not fit its type
    Decode,
}

/// ABI operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Malformed ABI, duplicate definition, alias cycle, bad reference
    #[error("schema error: {0}")]
    Schema(String),

    /// Type name could not be resolved
    #[error("unknown type \"{0}\"")]
    UnknownType(String),

    /// No ABI loaded for the contract
    #[error("no ABI loaded for contract \"{0}\"")]
    UnknownContract(Name),

    /// Contract ABI has no such action or table
    #[error("contract \"{contract}\" has no {what} \"{name}\"")]
    UnknownEntry {
        /// Contract
        contract: Name,
        /// `action` or `table`
        what: &'static str,
        /// Requested name
        name: Name,
    },

    /// JSON value does not match its type
    #[error("encode error at {path}: {reason}")]
    Encode {
        /// Field path, e.g. `transfer.quantity`
        path: String,
        /// What went wrong
        reason: String,
    },

    /// Binary data does not match its type
    #[error("decode error at {path} (offset {offset}): {reason}")]
    Decode {
        /// Field path
        path: String,
        /// Byte offset where the failing read started
        offset: usize,
        /// What went wrong
        reason: String,
    },
}

impl AbiError {
    /// Error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbiError::Schema(_) => ErrorKind::Schema,
            AbiError::UnknownType(_)
            | AbiError::UnknownContract(_)
            | AbiError::UnknownEntry { .. } => ErrorKind::Resolution,
            AbiError::Encode { .. } => ErrorKind::Encode,
            AbiError::Decode { .. } => ErrorKind::Decode,
        }
    }

    pub(crate) fn schema(reason: impl Into<String>) -> Self {
        AbiError::Schema(reason.into())
    }

    pub(crate) fn encode(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AbiError::Encode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn decode(path: impl Into<String>, offset: usize, reason: impl Into<String>) -> Self {
        AbiError::Decode {
            path: path.into(),
            offset,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(AbiError::schema("x").kind(), ErrorKind::Schema);
        assert_eq!(AbiError::UnknownType("foo".into()).kind(), ErrorKind::Resolution);
        assert_eq!(AbiError::UnknownContract(Name::EMPTY).kind(), ErrorKind::Resolution);
        assert_eq!(AbiError::encode("a.b", "bad").kind(), ErrorKind::Encode);
        assert_eq!(AbiError::decode("a", 3, "eof").kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_error_display_carries_path_and_offset() {
        let err = AbiError::decode("transfer.memo", 17, "unexpected end of data");
        assert_eq!(
            err.to_string(),
            "decode error at transfer.memo (offset 17): unexpected end of data"
        );
        let err = AbiError::encode("transfer.quantity", "invalid asset");
        assert_eq!(err.to_string(), "encode error at transfer.quantity: invalid asset");
    }
}
