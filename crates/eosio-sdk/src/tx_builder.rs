//! Transaction builder

use eosio_primitives::{ChainId, TimePointSec};

use crate::action::Action;
use crate::config::TxConfig;
use crate::transaction::Transaction;

/// Transaction builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct TxBuilder {
    chain_id: Option<ChainId>,
    config: TxConfig,
    expiration: Option<TimePointSec>,
    ref_block: Option<(u16, u32)>,
    max_net_usage_words: u32,
    max_cpu_usage_ms: u8,
    delay_sec: u32,
    context_free_actions: Vec<Action>,
    actions: Vec<Action>,
    extensions: Vec<(u16, Vec<u8>)>,
}

impl TxBuilder {
    /// Create a new transaction builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain id; otherwise it comes from the node
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Set the reference block and expiration policy
    pub fn config(mut self, config: TxConfig) -> Self {
        self.config = config;
        self
    }

    /// Set how far behind head the reference block is
    pub fn blocks_behind(mut self, blocks: u32) -> Self {
        self.config.blocks_behind = blocks;
        self
    }

    /// Set the lifetime past the head block time
    pub fn expire_seconds(mut self, seconds: u32) -> Self {
        self.config.expire_seconds = seconds;
        self
    }

    /// Set an absolute expiration
    pub fn expiration(mut self, expiration: TimePointSec) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Set the reference block fields directly
    pub fn ref_block(mut self, ref_block_num: u16, ref_block_prefix: u32) -> Self {
        self.ref_block = Some((ref_block_num, ref_block_prefix));
        self
    }

    /// Set the net usage limit in 8-byte words
    pub fn max_net_usage_words(mut self, words: u32) -> Self {
        self.max_net_usage_words = words;
        self
    }

    /// Set the CPU usage limit in milliseconds
    pub fn max_cpu_usage_ms(mut self, ms: u8) -> Self {
        self.max_cpu_usage_ms = ms;
        self
    }

    /// Set the delay in seconds
    pub fn delay_sec(mut self, seconds: u32) -> Self {
        self.delay_sec = seconds;
        self
    }

    /// Append an action
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append a context free action
    pub fn context_free_action(mut self, action: Action) -> Self {
        self.context_free_actions.push(action);
        self
    }

    /// Append an extension
    pub fn extension(mut self, ext_type: u16, data: Vec<u8>) -> Self {
        self.extensions.push((ext_type, data));
        self
    }

    /// Build the transaction
    pub fn build(self) -> Transaction {
        let mut trx = Transaction::with_config(self.config);
        trx.chain_id = self.chain_id;
        if let Some(expiration) = self.expiration {
            trx.expiration = expiration;
        }
        if let Some((num, prefix)) = self.ref_block {
            trx.ref_block_num = num;
            trx.ref_block_prefix = prefix;
        }
        trx.max_net_usage_words = self.max_net_usage_words;
        trx.max_cpu_usage_ms = self.max_cpu_usage_ms;
        trx.delay_sec = self.delay_sec;
        trx.context_free_actions = self.context_free_actions;
        trx.actions = self.actions;
        for (ext_type, data) in self.extensions {
            trx.add_extension(ext_type, data);
        }
        trx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::PermissionLevel;
    use eosio_primitives::Name;
    use serde_json::json;

    #[test]
    fn test_builder_defaults() {
        let trx = TxBuilder::new().build();
        assert_eq!(trx, Transaction::new());
        assert_eq!(trx.config, TxConfig::default());
    }

    #[test]
    fn test_builder_sets_header() {
        let expiration = TimePointSec::from_secs(1_551_205_910);
        let trx = TxBuilder::new()
            .chain_id(ChainId::from_bytes([1u8; 32]))
            .blocks_behind(12)
            .expire_seconds(60)
            .expiration(expiration)
            .ref_block(40361, 306112488)
            .max_net_usage_words(10)
            .max_cpu_usage_ms(5)
            .delay_sec(3)
            .extension(1, vec![0xff])
            .build();

        assert_eq!(trx.chain_id, Some(ChainId::from_bytes([1u8; 32])));
        assert_eq!(trx.config.blocks_behind, 12);
        assert_eq!(trx.config.expire_seconds, 60);
        assert_eq!(trx.expiration, expiration);
        assert_eq!((trx.ref_block_num, trx.ref_block_prefix), (40361, 306112488));
        assert_eq!(trx.max_net_usage_words, 10);
        assert_eq!(trx.max_cpu_usage_ms, 5);
        assert_eq!(trx.delay_sec, 3);
        assert_eq!(trx.transaction_extensions[0].ext_type, 1);
    }

    #[test]
    fn test_builder_keeps_action_order() {
        let make = |name: &str| {
            Action::new(
                Name::new("eosio.token").unwrap(),
                Name::new(name).unwrap(),
                vec![PermissionLevel::parse("alice", "active").unwrap()],
                json!({}),
            )
        };
        let trx = TxBuilder::new()
            .action(make("issue"))
            .context_free_action(make("open"))
            .action(make("transfer"))
            .build();
        let names: Vec<String> = trx.actions.iter().map(|a| a.name.to_string()).collect();
        assert_eq!(names, vec!["issue", "transfer"]);
        assert_eq!(trx.context_free_actions.len(), 1);
    }
}
