//! Codec configuration

use serde::{Deserialize, Serialize};

/// Settings shared by every conversion on an [`AbiContext`](crate::AbiContext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum nesting of structs, arrays, variants and optionals in one value
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Reject `bool` bytes other than 0 and 1 when decoding. When false,
    /// any non-zero byte decodes as `true`.
    #[serde(default = "default_strict_bool")]
    pub strict_bool: bool,
    /// Largest array length accepted on decode beyond the bytes left in the
    /// input. Only elements that occupy no bytes can reach it.
    #[serde(default = "default_max_array_len")]
    pub max_array_len: usize,
}

fn default_max_depth() -> usize {
    64
}

fn default_strict_bool() -> bool {
    true
}

fn default_max_array_len() -> usize {
    1 << 16
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            strict_bool: default_strict_bool(),
            max_array_len: default_max_array_len(),
        }
    }
}
