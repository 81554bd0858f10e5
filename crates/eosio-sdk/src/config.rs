//! Transaction configuration

use serde::{Deserialize, Serialize};

/// How [`Transaction::prepare`](crate::Transaction::prepare) fills in the
/// reference block and expiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfig {
    /// Reference block distance behind the head block
    #[serde(default = "default_blocks_behind")]
    pub blocks_behind: u32,
    /// Seconds after the head block time the transaction expires
    #[serde(default = "default_expire_seconds")]
    pub expire_seconds: u32,
}

fn default_blocks_behind() -> u32 {
    3
}

fn default_expire_seconds() -> u32 {
    5 * 60
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            blocks_behind: default_blocks_behind(),
            expire_seconds: default_expire_seconds(),
        }
    }
}
