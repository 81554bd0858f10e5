//! Raw contract ABIs collected for a transaction

use std::collections::HashMap;

use eosio_abi::{AbiContext, AbiDocument};
use eosio_crypto::sha256;
use eosio_primitives::Name;
use tracing::debug;

use crate::SdkError;

/// Binary ABIs keyed by contract account.
///
/// Every ABI is checked by decoding it through the built-in `abi_def`
/// type before it is stored.
#[derive(Debug, Clone, Default)]
pub struct Abis {
    abis: HashMap<Name, Vec<u8>>,
}

impl Abis {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the binary ABI of `account`, replacing any previous one
    pub fn add_abi(&mut self, ctx: &AbiContext, account: Name, abi: Vec<u8>) -> Result<(), SdkError> {
        ctx.deserialize_abi(&abi)?;
        debug!(%account, len = abi.len(), "abi added");
        self.abis.insert(account, abi);
        Ok(())
    }

    /// Store an ABI given as hex
    pub fn add_abi_hex(&mut self, ctx: &AbiContext, account: Name, hex_abi: &str) -> Result<(), SdkError> {
        self.add_abi(ctx, account, hex::decode(hex_abi)?)
    }

    /// Store an ABI given as JSON, packing it through `abi_def`
    pub fn add_abi_json(&mut self, ctx: &AbiContext, account: Name, json: &str) -> Result<(), SdkError> {
        let document = AbiDocument::from_json(json)?;
        let bin = ctx.serialize_abi(&document)?;
        self.add_abi(ctx, account, bin)
    }

    /// Check if `account` has an ABI
    pub fn contains(&self, account: Name) -> bool {
        self.abis.contains_key(&account)
    }

    /// Accounts among `accounts` with no ABI, deduplicated, in first-seen order
    pub fn missing_abis<I>(&self, accounts: I) -> Vec<Name>
    where
        I: IntoIterator<Item = Name>,
    {
        let mut missing: Vec<Name> = Vec::new();
        for account in accounts {
            if !self.contains(account) && !missing.contains(&account) {
                missing.push(account);
            }
        }
        missing
    }

    /// Binary ABI of `account`
    pub fn abi(&self, account: Name) -> Option<&[u8]> {
        self.abis.get(&account).map(Vec::as_slice)
    }

    /// Hex ABI of `account`
    pub fn hex_abi(&self, account: Name) -> Option<String> {
        self.abi(account).map(hex::encode)
    }

    /// SHA-256 of the binary ABI, as lowercase hex
    pub fn hash_abi(&self, account: Name) -> Option<String> {
        self.abi(account).map(|abi| sha256(abi).to_hex())
    }

    /// [`Abis::hash_abi`] for every stored account
    pub fn hash_abis(&self) -> HashMap<Name, String> {
        self.abis
            .iter()
            .map(|(account, abi)| (*account, sha256(abi).to_hex()))
            .collect()
    }

    /// Decoded ABI document of `account`
    pub fn document(&self, ctx: &AbiContext, account: Name) -> Result<AbiDocument, SdkError> {
        let abi = self
            .abi(account)
            .ok_or_else(|| SdkError::MissingAbis(vec![account]))?;
        Ok(ctx.deserialize_abi(abi)?)
    }

    /// ABI of `account` rendered as JSON text
    pub fn json_abi(&self, ctx: &AbiContext, account: Name) -> Result<String, SdkError> {
        Ok(self.document(ctx, account)?.to_json()?)
    }

    /// Number of stored ABIs
    pub fn len(&self) -> usize {
        self.abis.len()
    }

    /// Check if no ABI is stored
    pub fn is_empty(&self) -> bool {
        self.abis.is_empty()
    }
}
