//! Transaction assembly, signing and broadcast

use eosio_abi::AbiContext;
use eosio_crypto::{sha256, PublicKey, Signature};
use eosio_primitives::{ChainId, Name, TimeError, TimePointSec, TransactionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::abis::Abis;
use crate::action::Action;
use crate::config::TxConfig;
use crate::rpc::{PushTransactionRequest, PushTransactionResponse, RpcProvider};
use crate::signer::{SignatureProvider, SignatureRequest};
use crate::SdkError;

/// Typed extension attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionExtension {
    /// Extension type
    #[serde(rename = "type")]
    pub ext_type: u16,
    /// Payload
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

/// Packed transaction together with its signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Packed transaction bytes
    pub packed_trx: Vec<u8>,
    /// Signatures over the signing digest
    pub signatures: Vec<Signature>,
}

impl SignedTransaction {
    /// Transaction id: SHA-256 of the packed bytes
    pub fn id(&self) -> TransactionId {
        sha256(&self.packed_trx)
    }

    /// `push_transaction` body
    pub fn to_push_request(&self) -> PushTransactionRequest {
        PushTransactionRequest {
            signatures: self.signatures.clone(),
            compression: 0,
            packed_context_free_data: String::new(),
            packed_trx: hex::encode(&self.packed_trx),
        }
    }
}

/// A transaction under construction.
///
/// The usual flow is [`prepare`](Self::prepare) to fill the reference
/// block, expiration and action data, then [`sign`](Self::sign), then
/// [`broadcast`](Self::broadcast).
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Chain the transaction is for; taken from the node when unset
    pub chain_id: Option<ChainId>,
    /// Reference block and expiration policy
    pub config: TxConfig,
    /// Expiration time
    pub expiration: TimePointSec,
    /// Low 16 bits of the reference block number
    pub ref_block_num: u16,
    /// Prefix of the reference block id
    pub ref_block_prefix: u32,
    /// Net usage limit in 8-byte words, 0 for none
    pub max_net_usage_words: u32,
    /// CPU usage limit in milliseconds, 0 for none
    pub max_cpu_usage_ms: u8,
    /// Delay in seconds
    pub delay_sec: u32,
    /// Actions that read no state
    pub context_free_actions: Vec<Action>,
    /// Actions
    pub actions: Vec<Action>,
    /// Extensions
    pub transaction_extensions: Vec<TransactionExtension>,
    signed: Option<SignedTransaction>,
    transaction_id: Option<TransactionId>,
}

/// The `transaction` type of the built-in ABI
#[derive(Serialize, Deserialize)]
struct Wire {
    expiration: TimePointSec,
    ref_block_num: u16,
    ref_block_prefix: u32,
    max_net_usage_words: u32,
    max_cpu_usage_ms: u8,
    delay_sec: u32,
    context_free_actions: Vec<Value>,
    actions: Vec<Value>,
    transaction_extensions: Vec<TransactionExtension>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::with_config(TxConfig::default())
    }
}

impl Transaction {
    /// Create an empty transaction with the default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty transaction
    pub fn with_config(config: TxConfig) -> Self {
        Self {
            chain_id: None,
            config,
            expiration: TimePointSec::default(),
            ref_block_num: 0,
            ref_block_prefix: 0,
            max_net_usage_words: 0,
            max_cpu_usage_ms: 0,
            delay_sec: 0,
            context_free_actions: Vec::new(),
            actions: Vec::new(),
            transaction_extensions: Vec::new(),
            signed: None,
            transaction_id: None,
        }
    }

    /// Append an action
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Append a context free action
    pub fn add_context_free_action(&mut self, action: Action) {
        self.context_free_actions.push(action);
    }

    /// Append an extension
    pub fn add_extension(&mut self, ext_type: u16, data: Vec<u8>) {
        self.transaction_extensions.push(TransactionExtension { ext_type, data });
    }

    /// Result of the last [`sign`](Self::sign)
    pub fn signed(&self) -> Option<&SignedTransaction> {
        self.signed.as_ref()
    }

    /// Id reported by the node on broadcast
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    fn all_actions(&self) -> impl Iterator<Item = &Action> {
        self.context_free_actions.iter().chain(self.actions.iter())
    }

    fn all_actions_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        self.context_free_actions
            .iter_mut()
            .chain(self.actions.iter_mut())
    }

    /// Contracts whose ABI is needed to pack action data and is not in `abis`
    pub fn missing_abis(&self, abis: &Abis) -> Vec<Name> {
        abis.missing_abis(
            self.all_actions()
                .filter(|action| !action.is_data_serialized())
                .map(|action| action.account),
        )
    }

    /// Pack the data of every action against its contract's ABI
    pub fn serialize_action_data(&mut self, ctx: &AbiContext, abis: &Abis) -> Result<(), SdkError> {
        let missing = self.missing_abis(abis);
        if !missing.is_empty() {
            return Err(SdkError::MissingAbis(missing));
        }
        for action in self.all_actions_mut() {
            if !action.is_data_serialized() {
                let abi = abis.document(ctx, action.account)?;
                action.serialize_data(ctx, &abi)?;
            }
        }
        Ok(())
    }

    /// Unpack the data of every action whose contract ABI is in `abis`
    pub fn deserialize_action_data(&mut self, ctx: &AbiContext, abis: &Abis) -> Result<(), SdkError> {
        for action in self.all_actions_mut() {
            if action.is_data_serialized() && abis.contains(action.account) {
                let abi = abis.document(ctx, action.account)?;
                action.deserialize_data(ctx, &abi)?;
            }
        }
        Ok(())
    }

    /// JSON matching the built-in `transaction` type; action data must be packed
    pub fn to_json_value(&self) -> Result<Value, SdkError> {
        let wire = Wire {
            expiration: self.expiration,
            ref_block_num: self.ref_block_num,
            ref_block_prefix: self.ref_block_prefix,
            max_net_usage_words: self.max_net_usage_words,
            max_cpu_usage_ms: self.max_cpu_usage_ms,
            delay_sec: self.delay_sec,
            context_free_actions: self
                .context_free_actions
                .iter()
                .map(Action::to_packed_json)
                .collect::<Result<_, _>>()?,
            actions: self
                .actions
                .iter()
                .map(Action::to_packed_json)
                .collect::<Result<_, _>>()?,
            transaction_extensions: self.transaction_extensions.clone(),
        };
        Ok(serde_json::to_value(wire)?)
    }

    /// Pack the transaction.
    ///
    /// Fails unless expiration and the reference block are set and every
    /// action's data is packed. `ref_block_num` wraps through 0 every 65536
    /// blocks, so the reference block counts as set once `ref_block_prefix`
    /// is non-zero.
    pub fn serialize(&self, ctx: &AbiContext) -> Result<Vec<u8>, SdkError> {
        if self.ref_block_prefix == 0 {
            return Err(SdkError::MissingField("ref_block_prefix".to_string()));
        }
        if self.expiration.as_secs() == 0 {
            return Err(SdkError::MissingField("expiration".to_string()));
        }
        let packed = ctx.transaction_to_bin(&self.to_json_value()?)?;
        debug!(len = packed.len(), actions = self.actions.len(), "transaction serialized");
        Ok(packed)
    }

    /// Unpack a transaction; action data stays packed
    pub fn deserialize(ctx: &AbiContext, data: &[u8]) -> Result<Self, SdkError> {
        let wire: Wire = serde_json::from_value(ctx.transaction_from_bin(data)?)?;
        let mut transaction = Self::new();
        transaction.expiration = wire.expiration;
        transaction.ref_block_num = wire.ref_block_num;
        transaction.ref_block_prefix = wire.ref_block_prefix;
        transaction.max_net_usage_words = wire.max_net_usage_words;
        transaction.max_cpu_usage_ms = wire.max_cpu_usage_ms;
        transaction.delay_sec = wire.delay_sec;
        transaction.context_free_actions = wire
            .context_free_actions
            .into_iter()
            .map(Action::from_packed_json)
            .collect::<Result<_, _>>()?;
        transaction.actions = wire
            .actions
            .into_iter()
            .map(Action::from_packed_json)
            .collect::<Result<_, _>>()?;
        transaction.transaction_extensions = wire.transaction_extensions;
        Ok(transaction)
    }

    // ==================== Collaborator flow ====================

    /// Fill chain id, expiration and reference block from the node, fetch
    /// missing contract ABIs, and pack every action's data
    pub async fn prepare(
        &mut self,
        ctx: &AbiContext,
        rpc: &dyn RpcProvider,
        abis: &mut Abis,
    ) -> Result<(), SdkError> {
        self.fill_tapos(rpc).await?;
        self.fetch_abis(ctx, rpc, abis).await?;
        self.serialize_action_data(ctx, abis)
    }

    async fn fill_tapos(&mut self, rpc: &dyn RpcProvider) -> Result<(), SdkError> {
        // ref_block_num is legitimately 0 for every 65536th block
        let has_tapos = self.ref_block_prefix != 0;
        if self.chain_id.is_some() && self.expiration.as_secs() != 0 && has_tapos {
            return Ok(());
        }

        let info = rpc.get_info().await?;
        match self.chain_id {
            None => self.chain_id = Some(info.chain_id),
            Some(provided) if provided != info.chain_id => {
                return Err(SdkError::ChainIdMismatch {
                    provided,
                    node: info.chain_id,
                });
            }
            Some(_) => {}
        }

        if self.expiration.as_secs() == 0 {
            let head_secs = info.head_block_time.as_micros().div_euclid(1_000_000);
            let head = u32::try_from(head_secs)
                .map_err(|_| TimeError::OutOfRange(info.head_block_time.to_string()))
                .map_err(eosio_primitives::PrimitiveError::from)?;
            self.expiration = TimePointSec::from_secs(head).saturating_add(self.config.expire_seconds);
        }

        if !has_tapos {
            let block_num = info
                .head_block_num
                .saturating_sub(self.config.blocks_behind)
                .max(1);
            let block = rpc.get_block(block_num).await?;
            self.ref_block_num = (block.block_num & 0xffff) as u16;
            self.ref_block_prefix = block.ref_block_prefix;
        }

        debug!(
            ref_block_num = self.ref_block_num,
            ref_block_prefix = self.ref_block_prefix,
            expiration = %self.expiration,
            "tapos filled"
        );
        Ok(())
    }

    async fn fetch_abis(
        &self,
        ctx: &AbiContext,
        rpc: &dyn RpcProvider,
        abis: &mut Abis,
    ) -> Result<(), SdkError> {
        for account in self.missing_abis(abis) {
            let response = rpc.get_raw_abi(account).await?;
            let computed = sha256(&response.abi);
            if computed != response.abi_hash {
                return Err(SdkError::AbiHashMismatch {
                    account,
                    declared: response.abi_hash,
                    computed,
                });
            }
            abis.add_abi(ctx, account, response.abi)?;
        }
        Ok(())
    }

    /// Pack and sign with every key the provider offers
    pub async fn sign(
        &mut self,
        ctx: &AbiContext,
        signer: &dyn SignatureProvider,
    ) -> Result<&SignedTransaction, SdkError> {
        let keys = signer.available_keys().await?;
        self.sign_with_keys(ctx, signer, keys).await
    }

    /// Pack and sign with the given keys
    pub async fn sign_with_keys(
        &mut self,
        ctx: &AbiContext,
        signer: &dyn SignatureProvider,
        public_keys: Vec<PublicKey>,
    ) -> Result<&SignedTransaction, SdkError> {
        let chain_id = self
            .chain_id
            .ok_or_else(|| SdkError::MissingField("chain_id".to_string()))?;
        let packed_trx = self.serialize(ctx)?;
        let request = SignatureRequest {
            chain_id,
            serialized_transaction: packed_trx.clone(),
            public_keys,
        };
        let signatures = signer.sign(&request).await?;
        if signatures.is_empty() {
            return Err(SdkError::SignatureProvider(
                "provider returned no signatures".to_string(),
            ));
        }
        self.transaction_id = None;
        let signed = self.signed.insert(SignedTransaction {
            packed_trx,
            signatures,
        });
        Ok(&*signed)
    }

    /// Push the signed transaction; records the id the node reports
    pub async fn broadcast(
        &mut self,
        rpc: &dyn RpcProvider,
    ) -> Result<PushTransactionResponse, SdkError> {
        let signed = match &self.signed {
            Some(signed) if !signed.signatures.is_empty() => signed,
            _ => return Err(SdkError::NotSigned),
        };
        let response = rpc.push_transaction(&signed.to_push_request()).await?;
        info!(id = %response.transaction_id, "transaction broadcast");
        self.transaction_id = Some(response.transaction_id);
        Ok(response)
    }

    /// [`prepare`](Self::prepare), [`sign`](Self::sign) and
    /// [`broadcast`](Self::broadcast) in one call
    pub async fn sign_and_broadcast(
        &mut self,
        ctx: &AbiContext,
        rpc: &dyn RpcProvider,
        signer: &dyn SignatureProvider,
        abis: &mut Abis,
    ) -> Result<PushTransactionResponse, SdkError> {
        self.prepare(ctx, rpc, abis).await?;
        self.sign(ctx, signer).await?;
        self.broadcast(rpc).await
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
