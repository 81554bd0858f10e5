//! # eosio-primitives
//!
//! Primitive value types for EOSIO-style chains.
//!
//! Each type carries its wire value (little-endian on the wire) and the
//! canonical string form used in JSON.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod asset;
mod checksum;
mod error;
mod name;
mod time;

pub use asset::{Asset, AssetError, ExtendedAsset, Symbol, SymbolCode, MAX_PRECISION};
pub use checksum::{Checksum, Checksum160, Checksum256, Checksum512, ChecksumError};
pub use error::PrimitiveError;
pub use name::{Name, NameError};
pub use time::{
    BlockTimestamp, TimeError, TimePoint, TimePointSec, BLOCK_INTERVAL_MS,
    BLOCK_TIMESTAMP_EPOCH_MS,
};

/// Chain identifier
pub type ChainId = Checksum256;

/// Transaction identifier
pub type TransactionId = Checksum256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_error_from() {
        let err: PrimitiveError = Name::new("UPPER").unwrap_err().into();
        assert!(err.to_string().starts_with("name error"));
        let err: PrimitiveError = "x".parse::<Asset>().unwrap_err().into();
        assert!(matches!(err, PrimitiveError::Asset(_)));
    }
}
