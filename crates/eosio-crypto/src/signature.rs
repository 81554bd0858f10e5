//! Canonical signing and public key recovery for K1 (secp256k1) and
//! R1 (prime256v1) keys

use crate::keys::{
    KeyType, PrivateKey, PublicKey, Signature, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN, SIGNATURE_LEN,
};
use crate::CryptoError;
use eosio_primitives::Checksum256;
use k256::ecdsa::RecoveryId;
use rand::rngs::OsRng;

/// Attempts before giving up on finding a canonical signature
pub const MAX_SIGNING_ATTEMPTS: usize = 100;

/// Offset added to the recovery id in the first byte of a compact signature
/// (27 plus 4 for a compressed key)
const RECOVERY_OFFSET: u8 = 31;

/// Whether a compact `[v, r, s]` signature passes the chain's canonical check:
/// neither `r` nor `s` may have its top bit set, and neither may start with a
/// zero byte unless the following byte has its top bit set.
pub fn is_canonical(data: &[u8; SIGNATURE_LEN]) -> bool {
    (data[1] & 0x80) == 0
        && !(data[1] == 0 && (data[2] & 0x80) == 0)
        && (data[33] & 0x80) == 0
        && !(data[33] == 0 && (data[34] & 0x80) == 0)
}

fn compact(rs: &[u8], recovery_id: RecoveryId) -> [u8; SIGNATURE_LEN] {
    let mut data = [0u8; SIGNATURE_LEN];
    data[0] = recovery_id.to_byte() + RECOVERY_OFFSET;
    data[1..].copy_from_slice(rs);
    data
}

fn recovery_id(data: &[u8; SIGNATURE_LEN]) -> Result<RecoveryId, CryptoError> {
    data[0]
        .checked_sub(27)
        .and_then(|v| RecoveryId::from_byte(v & 3))
        .ok_or_else(|| CryptoError::InvalidSignature(format!("recovery byte {}", data[0])))
}

fn compressed(point: &[u8]) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
    point.try_into().map_err(|_| CryptoError::InvalidLength {
        expected: PUBLIC_KEY_LEN,
        got: point.len(),
    })
}

/// Per-curve operations over raw key and signature bytes
macro_rules! curve {
    ($module:ident, $curve:ident) => {
        mod $module {
            use super::*;
            use $curve::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
            use $curve::ecdsa::{Signature as CurveSignature, SigningKey, VerifyingKey};

            fn signing_key(secret: &[u8; PRIVATE_KEY_LEN]) -> Result<SigningKey, CryptoError> {
                SigningKey::from_slice(secret).map_err(|_| CryptoError::InvalidPrivateKey)
            }

            pub(super) fn generate() -> [u8; PRIVATE_KEY_LEN] {
                SigningKey::random(&mut OsRng).to_bytes().into()
            }

            pub(super) fn public_key(
                secret: &[u8; PRIVATE_KEY_LEN],
            ) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
                let key = signing_key(secret)?;
                compressed(key.verifying_key().to_encoded_point(true).as_bytes())
            }

            pub(super) fn sign(
                prehash: &[u8],
                secret: &[u8; PRIVATE_KEY_LEN],
            ) -> Result<[u8; SIGNATURE_LEN], CryptoError> {
                let signing_key = signing_key(secret)?;

                let (signature, recovery_id) = signing_key
                    .sign_prehash_recoverable(prehash)
                    .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
                let data = compact(&signature.to_bytes(), recovery_id);
                if is_canonical(&data) {
                    return Ok(data);
                }

                for _ in 1..MAX_SIGNING_ATTEMPTS {
                    let signature: CurveSignature = signing_key
                        .sign_prehash_with_rng(&mut OsRng, prehash)
                        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
                    let signature = signature.normalize_s().unwrap_or(signature);
                    let recovery_id = RecoveryId::trial_recovery_from_prehash(
                        signing_key.verifying_key(),
                        prehash,
                        &signature,
                    )
                    .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
                    let data = compact(&signature.to_bytes(), recovery_id);
                    if is_canonical(&data) {
                        return Ok(data);
                    }
                }

                Err(CryptoError::SigningFailed(format!(
                    "no canonical signature after {} attempts",
                    MAX_SIGNING_ATTEMPTS
                )))
            }

            fn signature(data: &[u8; SIGNATURE_LEN]) -> Result<CurveSignature, CryptoError> {
                CurveSignature::from_slice(&data[1..])
                    .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
            }

            pub(super) fn recover(
                prehash: &[u8],
                data: &[u8; SIGNATURE_LEN],
            ) -> Result<[u8; PUBLIC_KEY_LEN], CryptoError> {
                let key = VerifyingKey::recover_from_prehash(
                    prehash,
                    &signature(data)?,
                    recovery_id(data)?,
                )
                .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
                compressed(key.to_encoded_point(true).as_bytes())
            }

            pub(super) fn verify(
                prehash: &[u8],
                data: &[u8; SIGNATURE_LEN],
                public: &[u8; PUBLIC_KEY_LEN],
            ) -> Result<bool, CryptoError> {
                let signature = signature(data)?;
                let key = VerifyingKey::from_sec1_bytes(public)
                    .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
                Ok(key.verify_prehash(prehash, &signature).is_ok())
            }
        }
    };
}

curve!(k1, k256);
curve!(r1, p256);

impl PrivateKey {
    /// Generate a fresh K1 key from the OS random source
    pub fn generate() -> Self {
        Self::generate_of(KeyType::K1)
    }

    /// Generate a fresh key of the given type from the OS random source
    pub fn generate_of(key_type: KeyType) -> Self {
        let data = match key_type {
            KeyType::K1 => k1::generate(),
            KeyType::R1 => r1::generate(),
        };
        PrivateKey::new(key_type, data)
    }

    /// Derive the compressed public key
    pub fn public_key(&self) -> Result<PublicKey, CryptoError> {
        let data = match self.key_type() {
            KeyType::K1 => k1::public_key(self.data())?,
            KeyType::R1 => r1::public_key(self.data())?,
        };
        Ok(PublicKey::new(self.key_type(), data))
    }
}

/// Sign a 32-byte digest, retrying until the signature is canonical.
///
/// The first attempt is the deterministic RFC 6979 signature; later
/// attempts add fresh randomness.
pub fn sign_digest(digest: &Checksum256, key: &PrivateKey) -> Result<Signature, CryptoError> {
    let prehash = digest.as_bytes();
    let data = match key.key_type() {
        KeyType::K1 => k1::sign(prehash, key.data())?,
        KeyType::R1 => r1::sign(prehash, key.data())?,
    };
    Ok(Signature::new(key.key_type(), data))
}

/// Recover the signer's public key from a digest and signature
pub fn recover_public_key(
    digest: &Checksum256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let prehash = digest.as_bytes();
    let data = match signature.key_type() {
        KeyType::K1 => k1::recover(prehash, signature.data())?,
        KeyType::R1 => r1::recover(prehash, signature.data())?,
    };
    Ok(PublicKey::new(signature.key_type(), data))
}

/// Verify a signature against a digest and public key. A signature never
/// verifies against a key of the other curve.
pub fn verify(
    digest: &Checksum256,
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    if public_key.key_type() != signature.key_type() {
        return Ok(false);
    }
    let prehash = digest.as_bytes();
    match public_key.key_type() {
        KeyType::K1 => k1::verify(prehash, signature.data(), public_key.data()),
        KeyType::R1 => r1::verify(prehash, signature.data(), public_key.data()),
    }
}
