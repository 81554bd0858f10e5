//! In-memory RPC provider for tests

use std::collections::HashMap;

use async_trait::async_trait;
use eosio_crypto::sha256;
use eosio_primitives::{ChainId, Checksum256, Name, TimePoint};
use parking_lot::Mutex;
use serde_json::json;

use crate::rpc::{
    BlockResponse, InfoResponse, PushTransactionRequest, PushTransactionResponse, RawAbiResponse,
    RpcProvider,
};
use crate::SdkError;

/// Error code for a missing block, account or ABI
pub const NOT_FOUND: i64 = 404;

/// RPC provider answering from fixed chain state.
///
/// Blocks default to `ref_block_prefix` equal to the block number, and
/// pushed transactions are recorded and acknowledged with the SHA-256 of
/// their packed bytes.
pub struct MockRpcProvider {
    info: Mutex<InfoResponse>,
    blocks: Mutex<HashMap<u32, BlockResponse>>,
    abis: Mutex<HashMap<Name, RawAbiResponse>>,
    pushed: Mutex<Vec<PushTransactionRequest>>,
    calls: Mutex<Vec<String>>,
}

impl MockRpcProvider {
    /// Create a mock with the given chain id, head block and head block time
    pub fn new(chain_id: ChainId, head_block_num: u32, head_block_time: TimePoint) -> Self {
        Self {
            info: Mutex::new(InfoResponse {
                server_version: "mock".to_string(),
                chain_id,
                head_block_num,
                last_irreversible_block_num: head_block_num.saturating_sub(1),
                head_block_id: Checksum256::default(),
                head_block_time,
                head_block_producer: Name::default(),
            }),
            blocks: Mutex::new(HashMap::new()),
            abis: Mutex::new(HashMap::new()),
            pushed: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replace the `get_info` response
    pub fn set_info(&self, info: InfoResponse) {
        *self.info.lock() = info;
    }

    /// Serve a block with the given prefix
    pub fn add_block(&self, block_num: u32, ref_block_prefix: u32) {
        self.blocks.lock().insert(
            block_num,
            BlockResponse {
                block_num,
                ref_block_prefix,
                id: Checksum256::default(),
                producer: Name::default(),
            },
        );
    }

    /// Serve a binary ABI with its correct hash
    pub fn add_abi(&self, account: Name, abi: Vec<u8>) {
        let hash = sha256(&abi);
        self.add_abi_with_hash(account, abi, hash);
    }

    /// Serve a binary ABI with an arbitrary declared hash
    pub fn add_abi_with_hash(&self, account: Name, abi: Vec<u8>, abi_hash: Checksum256) {
        self.abis.lock().insert(
            account,
            RawAbiResponse {
                account_name: account,
                code_hash: Checksum256::default(),
                abi_hash,
                abi,
            },
        );
    }

    /// Transactions received by `push_transaction`
    pub fn pushed(&self) -> Vec<PushTransactionRequest> {
        self.pushed.lock().clone()
    }

    /// Calls made so far, as `method` or `method:arg`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

fn not_found(what: String) -> SdkError {
    SdkError::Rpc {
        code: NOT_FOUND,
        message: what,
    }
}

#[async_trait]
impl RpcProvider for MockRpcProvider {
    async fn get_info(&self) -> Result<InfoResponse, SdkError> {
        self.record("get_info".to_string());
        Ok(self.info.lock().clone())
    }

    async fn get_block(&self, block_num: u32) -> Result<BlockResponse, SdkError> {
        self.record(format!("get_block:{}", block_num));
        self.blocks
            .lock()
            .get(&block_num)
            .cloned()
            .ok_or_else(|| not_found(format!("Unknown block: {}", block_num)))
    }

    async fn get_raw_abi(&self, account: Name) -> Result<RawAbiResponse, SdkError> {
        self.record(format!("get_raw_abi:{}", account));
        self.abis
            .lock()
            .get(&account)
            .cloned()
            .ok_or_else(|| not_found(format!("Unknown account: {}", account)))
    }

    async fn push_transaction(
        &self,
        request: &PushTransactionRequest,
    ) -> Result<PushTransactionResponse, SdkError> {
        self.record("push_transaction".to_string());
        let packed = hex::decode(&request.packed_trx)?;
        self.pushed.lock().push(request.clone());
        Ok(PushTransactionResponse {
            transaction_id: sha256(&packed),
            processed: json!({"receipt": {"status": "executed"}}),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock() -> MockRpcProvider {
        MockRpcProvider::new(ChainId::default(), 100, TimePoint::from_micros(0))
    }

    #[tokio::test]
    async fn test_unknown_block() {
        let rpc = mock();
        let err = rpc.get_block(7).await.unwrap_err();
        assert!(matches!(err, SdkError::Rpc { code: NOT_FOUND, .. }));
        assert_eq!(rpc.calls(), vec!["get_block:7"]);
    }

    #[tokio::test]
    async fn test_add_abi_hashes_bytes() {
        let rpc = mock();
        let account = Name::new("eosio.token").unwrap();
        rpc.add_abi(account, vec![1, 2, 3]);
        let response = rpc.get_raw_abi(account).await.unwrap();
        assert_eq!(response.abi_hash, sha256(&[1, 2, 3]));
    }

    #[tokio::test]
    async fn test_push_records_request() {
        let rpc = mock();
        let request = PushTransactionRequest {
            signatures: vec![],
            compression: 0,
            packed_context_free_data: String::new(),
            packed_trx: "abcd".to_string(),
        };
        let response = rpc.push_transaction(&request).await.unwrap();
        assert_eq!(response.transaction_id, sha256(&[0xab, 0xcd]));
        assert_eq!(rpc.pushed(), vec![request]);
    }
}
