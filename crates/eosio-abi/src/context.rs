//! Per-instance ABI registry and conversion entry points

use crate::builtin_abis::{abi_def_abi, transaction_abi};
use crate::{AbiDocument, AbiError, ContextConfig, Contract};
use eosio_primitives::Name;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Root type of the built-in transaction ABI
pub const TRANSACTION_TYPE: &str = "transaction";

/// Root type of the built-in ABI layout
pub const ABI_DEF_TYPE: &str = "abi_def";

/// Holds the ABIs loaded for each contract plus the two built-in ones.
///
/// Loaded ABIs are immutable [`Contract`] snapshots behind an [`Arc`];
/// replacing one swaps the pointer, so a conversion that already picked up
/// a snapshot finishes against it. All methods take `&self`, and the
/// context can be shared across threads.
pub struct AbiContext {
    config: ContextConfig,
    contracts: RwLock<HashMap<Name, Arc<Contract>>>,
    transaction: Contract,
    abi_def: Contract,
    last_error: Mutex<Option<String>>,
}

impl AbiContext {
    /// Create a context with the default configuration
    pub fn new() -> Result<Self, AbiError> {
        Self::with_config(ContextConfig::default())
    }

    /// Create a context
    pub fn with_config(config: ContextConfig) -> Result<Self, AbiError> {
        Ok(AbiContext {
            config,
            contracts: RwLock::new(HashMap::new()),
            transaction: Contract::new(transaction_abi())?,
            abi_def: Contract::new(abi_def_abi())?,
            last_error: Mutex::new(None),
        })
    }

    /// Codec configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// The built-in transaction ABI
    pub fn transaction_contract(&self) -> &Contract {
        &self.transaction
    }

    /// The built-in `abi_def` ABI
    pub fn abi_def_contract(&self) -> &Contract {
        &self.abi_def
    }

    // ==================== Errors ====================

    fn record<T>(&self, result: Result<T, AbiError>) -> Result<T, AbiError> {
        if let Err(e) = &result {
            warn!(error = %e, "ABI call failed");
            *self.last_error.lock() = Some(e.to_string());
        }
        result
    }

    /// Message of the most recent failed call
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Forget the recorded error
    pub fn clear_error(&self) {
        *self.last_error.lock() = None;
    }

    // ==================== Registry ====================

    fn install(&self, contract: Name, document: AbiDocument) -> Result<Arc<Contract>, AbiError> {
        let loaded = Arc::new(Contract::new(document)?);
        let replaced = self
            .contracts
            .write()
            .insert(contract, Arc::clone(&loaded))
            .is_some();
        debug!(
            %contract,
            replaced,
            structs = loaded.document().structs.len(),
            actions = loaded.document().actions.len(),
            "ABI loaded"
        );
        Ok(loaded)
    }

    fn loaded(&self, contract: Name) -> Result<Arc<Contract>, AbiError> {
        self.contract(contract)
            .ok_or(AbiError::UnknownContract(contract))
    }

    /// Load an ABI from its JSON form, replacing any previous one
    pub fn set_abi(&self, contract: Name, json: &str) -> Result<Arc<Contract>, AbiError> {
        self.record(AbiDocument::from_json(json).and_then(|doc| self.install(contract, doc)))
    }

    /// Load an already parsed ABI
    pub fn set_abi_document(
        &self,
        contract: Name,
        document: AbiDocument,
    ) -> Result<Arc<Contract>, AbiError> {
        self.record(self.install(contract, document))
    }

    /// Load an ABI from its `abi_def` binary form
    pub fn set_abi_bin(&self, contract: Name, data: &[u8]) -> Result<Arc<Contract>, AbiError> {
        self.record(
            self.abi_from_bin(data)
                .and_then(|doc| self.install(contract, doc)),
        )
    }

    /// Load an ABI from hex of its `abi_def` binary form
    pub fn set_abi_hex(&self, contract: Name, hex_str: &str) -> Result<Arc<Contract>, AbiError> {
        self.record(
            decode_hex(ABI_DEF_TYPE, hex_str)
                .and_then(|data| self.abi_from_bin(&data))
                .and_then(|doc| self.install(contract, doc)),
        )
    }

    /// Unload a contract's ABI; returns whether one was loaded
    pub fn remove_abi(&self, contract: Name) -> bool {
        let removed = self.contracts.write().remove(&contract).is_some();
        if removed {
            debug!(%contract, "ABI removed");
        }
        removed
    }

    /// Snapshot of a loaded contract
    pub fn contract(&self, contract: Name) -> Option<Arc<Contract>> {
        self.contracts.read().get(&contract).cloned()
    }

    /// Document of a loaded contract
    pub fn get_abi(&self, contract: Name) -> Option<AbiDocument> {
        self.contract(contract).map(|c| c.document().clone())
    }

    /// Contracts with a loaded ABI, sorted
    pub fn contracts(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.contracts.read().keys().copied().collect();
        names.sort();
        names
    }

    /// Payload type of a contract action
    pub fn type_for_action(&self, contract: Name, action: Name) -> Result<String, AbiError> {
        self.record(self.loaded(contract).and_then(|c| {
            c.action_type(action)
                .map(str::to_string)
                .ok_or(AbiError::UnknownEntry {
                    contract,
                    what: "action",
                    name: action,
                })
        }))
    }

    /// Row type of a contract table
    pub fn type_for_table(&self, contract: Name, table: Name) -> Result<String, AbiError> {
        self.record(self.loaded(contract).and_then(|c| {
            c.table_type(table)
                .map(str::to_string)
                .ok_or(AbiError::UnknownEntry {
                    contract,
                    what: "table",
                    name: table,
                })
        }))
    }

    // ==================== Conversions against loaded contracts ====================

    /// Encode JSON text as `type_name` of a loaded contract
    pub fn json_to_bin(&self, contract: Name, type_name: &str, json: &str) -> Result<Vec<u8>, AbiError> {
        self.record(
            parse_json(type_name, json)
                .and_then(|value| self.encode_with(contract, type_name, &value)),
        )
    }

    /// Encode a JSON value as `type_name` of a loaded contract
    pub fn json_value_to_bin(
        &self,
        contract: Name,
        type_name: &str,
        value: &Value,
    ) -> Result<Vec<u8>, AbiError> {
        self.record(self.encode_with(contract, type_name, value))
    }

    /// Decode `data` as `type_name` of a loaded contract, rendered as JSON text
    pub fn bin_to_json(&self, contract: Name, type_name: &str, data: &[u8]) -> Result<String, AbiError> {
        self.record(
            self.decode_with(contract, type_name, data)
                .and_then(|value| render_json(type_name, &value)),
        )
    }

    /// Decode `data` as `type_name` of a loaded contract
    pub fn bin_to_json_value(
        &self,
        contract: Name,
        type_name: &str,
        data: &[u8],
    ) -> Result<Value, AbiError> {
        self.record(self.decode_with(contract, type_name, data))
    }

    /// Decode hex as `type_name` of a loaded contract, rendered as JSON text
    pub fn hex_to_json(&self, contract: Name, type_name: &str, hex_str: &str) -> Result<String, AbiError> {
        self.record(
            decode_hex(type_name, hex_str)
                .and_then(|data| self.decode_with(contract, type_name, &data))
                .and_then(|value| render_json(type_name, &value)),
        )
    }

    fn encode_with(&self, contract: Name, type_name: &str, value: &Value) -> Result<Vec<u8>, AbiError> {
        trace!(%contract, type_name, "json_to_bin");
        self.loaded(contract)?
            .json_to_bin(type_name, value, &self.config)
    }

    fn decode_with(&self, contract: Name, type_name: &str, data: &[u8]) -> Result<Value, AbiError> {
        trace!(%contract, type_name, len = data.len(), "bin_to_json");
        self.loaded(contract)?
            .bin_to_json(type_name, data, &self.config)
    }

    // ==================== Entry points with an explicit ABI ====================

    fn ensure_abi(&self, contract: Name, abi: &AbiDocument) -> Result<Arc<Contract>, AbiError> {
        if let Some(current) = self.contract(contract) {
            if current.document() == abi {
                return Ok(current);
            }
        }
        self.install(contract, abi.clone())
    }

    /// Encode JSON text as an action's payload or a named type of `abi`,
    /// returning lowercase hex.
    ///
    /// `abi` is loaded for `contract` (the empty name when `None`) unless it
    /// is already the current one. An action name takes precedence over a
    /// type of the same name.
    pub fn serialize(
        &self,
        contract: Option<Name>,
        action_or_type: &str,
        json: &str,
        abi: &AbiDocument,
    ) -> Result<String, AbiError> {
        let contract = contract.unwrap_or(Name::EMPTY);
        self.record((|| -> Result<String, AbiError> {
            let value = parse_json(action_or_type, json)?;
            let loaded = self.ensure_abi(contract, abi)?;
            let type_name = loaded.action_or_type(action_or_type);
            trace!(%contract, action_or_type, type_name, "serialize");
            let bytes = loaded.json_to_bin(type_name, &value, &self.config)?;
            Ok(hex::encode(bytes))
        })())
    }

    /// Decode hex as an action's payload or a named type of `abi`,
    /// returning JSON text
    pub fn deserialize(
        &self,
        contract: Option<Name>,
        action_or_type: &str,
        hex_str: &str,
        abi: &AbiDocument,
    ) -> Result<String, AbiError> {
        let contract = contract.unwrap_or(Name::EMPTY);
        self.record((|| -> Result<String, AbiError> {
            let data = decode_hex(action_or_type, hex_str)?;
            let loaded = self.ensure_abi(contract, abi)?;
            let type_name = loaded.action_or_type(action_or_type);
            trace!(%contract, action_or_type, type_name, "deserialize");
            let value = loaded.bin_to_json(type_name, &data, &self.config)?;
            render_json(type_name, &value)
        })())
    }

    // ==================== Built-in ABIs ====================

    /// Pack a transaction JSON value
    pub fn transaction_to_bin(&self, value: &Value) -> Result<Vec<u8>, AbiError> {
        self.record(
            self.transaction
                .json_to_bin(TRANSACTION_TYPE, value, &self.config),
        )
    }

    /// Unpack a transaction
    pub fn transaction_from_bin(&self, data: &[u8]) -> Result<Value, AbiError> {
        self.record(
            self.transaction
                .bin_to_json(TRANSACTION_TYPE, data, &self.config),
        )
    }

    /// Pack transaction JSON text, returning lowercase hex
    pub fn serialize_transaction(&self, json: &str) -> Result<String, AbiError> {
        let value = self.record(parse_json(TRANSACTION_TYPE, json))?;
        self.transaction_to_bin(&value).map(hex::encode)
    }

    /// Unpack a transaction from hex, returning JSON text
    pub fn deserialize_transaction(&self, hex_str: &str) -> Result<String, AbiError> {
        let data = self.record(decode_hex(TRANSACTION_TYPE, hex_str))?;
        let value = self.transaction_from_bin(&data)?;
        self.record(render_json(TRANSACTION_TYPE, &value))
    }

    /// Pack an ABI document in the `abi_def` layout
    pub fn serialize_abi(&self, document: &AbiDocument) -> Result<Vec<u8>, AbiError> {
        self.record((|| -> Result<Vec<u8>, AbiError> {
            let mut document = document.clone();
            // A present trailing extension needs every earlier one present
            if document.action_results.is_some() && document.variants.is_none() {
                document.variants = Some(Vec::new());
            }
            let value = serde_json::to_value(&document)
                .map_err(|e| AbiError::schema(format!("cannot render ABI: {}", e)))?;
            self.abi_def.json_to_bin(ABI_DEF_TYPE, &value, &self.config)
        })())
    }

    /// Unpack an ABI document from the `abi_def` layout
    pub fn deserialize_abi(&self, data: &[u8]) -> Result<AbiDocument, AbiError> {
        self.record(self.abi_from_bin(data))
    }

    fn abi_from_bin(&self, data: &[u8]) -> Result<AbiDocument, AbiError> {
        let value = self.abi_def.bin_to_json(ABI_DEF_TYPE, data, &self.config)?;
        serde_json::from_value(value).map_err(|e| AbiError::schema(format!("malformed binary ABI: {}", e)))
    }

    // ==================== Names ====================

    /// Pack a name string
    pub fn string_to_name(&self, s: &str) -> Result<u64, AbiError> {
        self.record(
            Name::new(s)
                .map(|name| name.as_u64())
                .map_err(|e| AbiError::encode("name", e.to_string())),
        )
    }

    /// Unpack a name value
    pub fn name_to_string(&self, value: u64) -> String {
        Name::from_u64(value).to_string()
    }
}

impl std::fmt::Debug for AbiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbiContext")
            .field("config", &self.config)
            .field("contracts", &self.contracts())
            .finish()
    }
}

fn parse_json(type_name: &str, json: &str) -> Result<Value, AbiError> {
    serde_json::from_str(json).map_err(|e| AbiError::encode(type_name, format!("malformed JSON: {}", e)))
}

fn render_json(type_name: &str, value: &Value) -> Result<String, AbiError> {
    serde_json::to_string(value).map_err(|e| AbiError::decode(type_name, 0, e.to_string()))
}

fn decode_hex(type_name: &str, hex_str: &str) -> Result<Vec<u8>, AbiError> {
    hex::decode(hex_str).map_err(|e| AbiError::decode(type_name, 0, format!("invalid hex: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn n(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    const TOKEN_ABI: &str = r#"{
        "version": "eosio::abi/1.1",
        "structs": [{"name": "transfer", "base": "", "fields": [
            {"name": "from", "type": "name"},
            {"name": "to", "type": "name"},
            {"name": "quantity", "type": "asset"},
            {"name": "memo", "type": "string"}
        ]}],
        "actions": [{"name": "transfer", "type": "transfer", "ricardian_contract": ""}],
        "tables": []
    }"#;

    #[test]
    fn test_set_get_remove() {
        let ctx = AbiContext::new().unwrap();
        assert!(ctx.get_abi(n("eosio.token")).is_none());
        ctx.set_abi(n("eosio.token"), TOKEN_ABI).unwrap();
        assert_eq!(ctx.contracts(), vec![n("eosio.token")]);
        assert_eq!(ctx.get_abi(n("eosio.token")).unwrap().structs.len(), 1);
        assert_eq!(ctx.type_for_action(n("eosio.token"), n("transfer")).unwrap(), "transfer");
        assert!(ctx.remove_abi(n("eosio.token")));
        assert!(!ctx.remove_abi(n("eosio.token")));
        assert!(ctx.contracts().is_empty());
    }

    #[test]
    fn test_failed_set_keeps_previous() {
        let ctx = AbiContext::new().unwrap();
        ctx.set_abi(n("eosio.token"), TOKEN_ABI).unwrap();
        let err = ctx
            .set_abi(n("eosio.token"), r#"{"structs":[{"name":"a","fields":[{"name":"x","type":"nope"}]}]}"#)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Schema);
        assert_eq!(ctx.type_for_action(n("eosio.token"), n("transfer")).unwrap(), "transfer");
    }

    #[test]
    fn test_unknown_contract_and_entry() {
        let ctx = AbiContext::new().unwrap();
        let err = ctx.json_to_bin(n("nobody"), "uint8", "1").unwrap_err();
        assert_eq!(err, AbiError::UnknownContract(n("nobody")));
        ctx.set_abi(n("eosio.token"), TOKEN_ABI).unwrap();
        let err = ctx.type_for_table(n("eosio.token"), n("accounts")).unwrap_err();
        assert!(matches!(err, AbiError::UnknownEntry { what: "table", .. }));
    }

    #[test]
    fn test_last_error_slot() {
        let ctx = AbiContext::new().unwrap();
        assert!(ctx.last_error().is_none());
        assert!(ctx.string_to_name("NOT VALID").is_err());
        assert!(ctx.last_error().is_some());
        assert_eq!(ctx.string_to_name("alice").unwrap(), 0x345c_8500_0000_0000);
        assert!(ctx.last_error().is_some());
        ctx.clear_error();
        assert!(ctx.last_error().is_none());
    }

    #[test]
    fn test_names() {
        let ctx = AbiContext::new().unwrap();
        assert_eq!(ctx.name_to_string(0x5530_ea00_0000_0000), "eosio");
        assert_eq!(ctx.name_to_string(0), "");
    }

    #[test]
    fn test_serialize_installs_abi_once() {
        let ctx = AbiContext::new().unwrap();
        let abi = AbiDocument::from_json(TOKEN_ABI).unwrap();
        let json = r#"{"from":"alice","to":"bob","quantity":"1.0000 SYS","memo":"hi"}"#;
        let hex1 = ctx.serialize(Some(n("eosio.token")), "transfer", json, &abi).unwrap();
        let first = ctx.contract(n("eosio.token")).unwrap();
        let hex2 = ctx.serialize(Some(n("eosio.token")), "transfer", json, &abi).unwrap();
        assert_eq!(hex1, hex2);
        assert!(Arc::ptr_eq(&first, &ctx.contract(n("eosio.token")).unwrap()));
        let back = ctx.deserialize(Some(n("eosio.token")), "transfer", &hex1, &abi).unwrap();
        let back: Value = serde_json::from_str(&back).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn test_serialize_without_contract() {
        let ctx = AbiContext::new().unwrap();
        let abi = AbiDocument::default();
        assert_eq!(ctx.serialize(None, "uint16", "258", &abi).unwrap(), "0201");
        assert_eq!(ctx.deserialize(None, "uint16", "0201", &abi).unwrap(), "258");
        assert!(ctx.deserialize(None, "uint16", "zz", &abi).is_err());
    }

    #[test]
    fn test_transaction_value_round_trip() {
        let ctx = AbiContext::new().unwrap();
        let trx = json!({
            "expiration": "2019-02-26T18:31:50.000",
            "ref_block_num": 1,
            "ref_block_prefix": 2,
            "max_net_usage_words": 0,
            "max_cpu_usage_ms": 0,
            "delay_sec": 0,
            "context_free_actions": [],
            "actions": [],
            "transaction_extensions": []
        });
        let bytes = ctx.transaction_to_bin(&trx).unwrap();
        assert_eq!(ctx.transaction_from_bin(&bytes).unwrap(), trx);
    }
}
