//! Chain RPC collaborator

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use eosio_crypto::Signature;
use eosio_primitives::{ChainId, Checksum256, Name, TimePoint};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::SdkError;

/// `get_info` response, the fields the SDK needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Node version
    #[serde(default)]
    pub server_version: String,
    /// Chain id
    pub chain_id: ChainId,
    /// Head block number
    pub head_block_num: u32,
    /// Last irreversible block number
    #[serde(default)]
    pub last_irreversible_block_num: u32,
    /// Head block id
    #[serde(default)]
    pub head_block_id: Checksum256,
    /// Head block time
    pub head_block_time: TimePoint,
    /// Head block producer
    #[serde(default)]
    pub head_block_producer: Name,
}

/// `get_block` response, the fields the SDK needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResponse {
    /// Block number
    pub block_num: u32,
    /// Low 32 bits of the block id after the block number
    pub ref_block_prefix: u32,
    /// Block id
    #[serde(default)]
    pub id: Checksum256,
    /// Producer
    #[serde(default)]
    pub producer: Name,
}

/// `get_raw_abi` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAbiResponse {
    /// Contract account
    pub account_name: Name,
    /// Hash of the contract code
    #[serde(default)]
    pub code_hash: Checksum256,
    /// Declared SHA-256 of `abi`
    pub abi_hash: Checksum256,
    /// Binary ABI, base64 on the wire
    #[serde(with = "base64_bytes")]
    pub abi: Vec<u8>,
}

/// `push_transaction` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushTransactionRequest {
    /// Signatures over the transaction
    pub signatures: Vec<Signature>,
    /// Compression of `packed_trx`; always 0
    pub compression: u8,
    /// Packed context free data as hex
    pub packed_context_free_data: String,
    /// Packed transaction as hex
    pub packed_trx: String,
}

/// `push_transaction` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushTransactionResponse {
    /// Id of the accepted transaction
    pub transaction_id: Checksum256,
    /// Execution trace
    #[serde(default)]
    pub processed: Value,
}

/// Chain RPC operations used to prepare and broadcast transactions (object-safe)
#[async_trait]
pub trait RpcProvider: Send + Sync {
    /// Chain state summary
    async fn get_info(&self) -> Result<InfoResponse, SdkError>;

    /// Block by number
    async fn get_block(&self, block_num: u32) -> Result<BlockResponse, SdkError>;

    /// Binary ABI of a contract
    async fn get_raw_abi(&self, account: Name) -> Result<RawAbiResponse, SdkError>;

    /// Submit a signed transaction
    async fn push_transaction(
        &self,
        request: &PushTransactionRequest,
    ) -> Result<PushTransactionResponse, SdkError>;
}

mod base64_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        // Nodes sometimes drop the padding
        let trimmed = s.trim_end_matches('=');
        let padded = format!("{}{}", trimmed, "=".repeat((4 - trimmed.len() % 4) % 4));
        STANDARD.decode(padded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_from_node_json() {
        let info: InfoResponse = serde_json::from_str(
            r#"{
                "server_version": "0f6695cb",
                "chain_id": "687fa513e18843ad3e820744f4ffcf93b1354036d80737db8dc444fe4b15ad17",
                "head_block_num": 9430,
                "last_irreversible_block_num": 9429,
                "head_block_id": "000024d6e62aacd11b3f8d51c5d9f3ed8ad43a34c4c4f7e87b1a7c4ee1d65a3b",
                "head_block_time": "2018-08-24T19:31:56.500",
                "head_block_producer": "eosio",
                "virtual_block_cpu_limit": 200000
            }"#,
        )
        .unwrap();
        assert_eq!(info.head_block_num, 9430);
        assert_eq!(info.head_block_time.to_string(), "2018-08-24T19:31:56.500");
        assert_eq!(info.head_block_producer, Name::new("eosio").unwrap());
    }

    #[test]
    fn test_raw_abi_base64() {
        let response: RawAbiResponse = serde_json::from_str(
            r#"{
                "account_name": "eosio.token",
                "code_hash": "0000000000000000000000000000000000000000000000000000000000000000",
                "abi_hash": "0000000000000000000000000000000000000000000000000000000000000000",
                "abi": "DmVvc2lvOjphYmkvMS4w"
            }"#,
        )
        .unwrap();
        assert_eq!(response.abi[0], 0x0e);
        assert_eq!(&response.abi[1..], b"eosio::abi/1.0");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["abi"], "DmVvc2lvOjphYmkvMS4w");
    }

    #[test]
    fn test_raw_abi_unpadded_base64() {
        let response: RawAbiResponse = serde_json::from_str(
            r#"{"account_name": "a", "abi_hash": "0000000000000000000000000000000000000000000000000000000000000000", "abi": "AQI"}"#,
        )
        .unwrap();
        assert_eq!(response.abi, vec![1, 2]);
    }

    #[test]
    fn test_push_request_shape() {
        let request = PushTransactionRequest {
            signatures: vec![],
            compression: 0,
            packed_context_free_data: String::new(),
            packed_trx: "00".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["compression"], 0);
        assert_eq!(json["packed_trx"], "00");
        assert_eq!(json["packed_context_free_data"], "");
    }
}
