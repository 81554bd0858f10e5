//! Common error types for primitives

use crate::asset::AssetError;
use crate::checksum::ChecksumError;
use crate::name::NameError;
use crate::time::TimeError;
use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Name error
    #[error("name error: {0}")]
    Name(#[from] NameError),

    /// Checksum error
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    /// Time error
    #[error("time error: {0}")]
    Time(#[from] TimeError),

    /// Symbol or asset error
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}
