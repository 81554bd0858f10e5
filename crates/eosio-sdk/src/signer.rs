//! Signature provider collaborator

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use eosio_crypto::{sha256, sign_digest, PrivateKey, PublicKey, Signature};
use eosio_primitives::{ChainId, Checksum256};
use tracing::debug;

use crate::SdkError;

/// What a signature provider is asked to sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    /// Chain the transaction is for
    pub chain_id: ChainId,
    /// Packed transaction
    pub serialized_transaction: Vec<u8>,
    /// Keys that should sign
    pub public_keys: Vec<PublicKey>,
}

impl SignatureRequest {
    /// Digest every key signs
    pub fn digest(&self) -> Checksum256 {
        signing_digest(&self.chain_id, &self.serialized_transaction)
    }
}

/// `sha256(chain_id || packed_trx || sha256-of-no-context-free-data)`.
///
/// Context free data is never attached, so the trailing hash is 32 zero
/// bytes.
pub fn signing_digest(chain_id: &ChainId, packed_trx: &[u8]) -> Checksum256 {
    let mut data = Vec::with_capacity(32 + packed_trx.len() + 32);
    data.extend_from_slice(chain_id.as_bytes());
    data.extend_from_slice(packed_trx);
    data.extend_from_slice(&[0u8; 32]);
    sha256(&data)
}

/// Source of transaction signatures (object-safe)
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    /// Public keys this provider can sign with
    async fn available_keys(&self) -> Result<Vec<PublicKey>, SdkError>;

    /// Sign the request with each of its keys
    async fn sign(&self, request: &SignatureRequest) -> Result<Vec<Signature>, SdkError>;
}

/// Signs with K1 or R1 private keys held in memory.
///
/// Keys are zeroized when the provider is dropped.
pub struct SoftkeySignatureProvider {
    keys: BTreeMap<PublicKey, PrivateKey>,
}

impl SoftkeySignatureProvider {
    /// Create a provider with no keys
    pub fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Create a provider from private key strings (WIF or `PVT_K1_`)
    pub fn from_strs<I, S>(keys: I) -> Result<Self, SdkError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut provider = Self::new();
        for key in keys {
            provider.add_key(key.as_ref().parse()?)?;
        }
        Ok(provider)
    }

    /// Add a key, returning its public key
    pub fn add_key(&mut self, key: PrivateKey) -> Result<PublicKey, SdkError> {
        let public_key = key.public_key()?;
        self.keys.insert(public_key, key);
        Ok(public_key)
    }

    /// Generate and add a fresh key
    pub fn generate(&mut self) -> Result<PublicKey, SdkError> {
        self.add_key(PrivateKey::generate())
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no key is held
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for SoftkeySignatureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SoftkeySignatureProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftkeySignatureProvider")
            .field("public_keys", &self.keys.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SignatureProvider for SoftkeySignatureProvider {
    async fn available_keys(&self) -> Result<Vec<PublicKey>, SdkError> {
        Ok(self.keys.keys().copied().collect())
    }

    async fn sign(&self, request: &SignatureRequest) -> Result<Vec<Signature>, SdkError> {
        let digest = request.digest();
        let mut signatures = Vec::with_capacity(request.public_keys.len());
        for public_key in &request.public_keys {
            let key = self.keys.get(public_key).ok_or_else(|| {
                SdkError::SignatureProvider(format!("no private key for {}", public_key))
            })?;
            signatures.push(sign_digest(&digest, key)?);
        }
        debug!(count = signatures.len(), %digest, "transaction signed");
        Ok(signatures)
    }
}
