//! # eosio-crypto
//!
//! Cryptographic primitives for EOSIO chains.
//!
//! - SHA-256 and RIPEMD-160 digests
//! - Public/private keys and signatures with their string forms
//! - Canonical K1 and R1 signing and public key recovery

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod keys;
mod signature;

pub use error::CryptoError;
pub use hash::{ripemd160, sha256, sha256d};
pub use keys::{
    KeyType, PrivateKey, PublicKey, Signature, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN,
};
pub use signature::{
    is_canonical, recover_public_key, sign_digest, verify, MAX_SIGNING_ATTEMPTS,
};
