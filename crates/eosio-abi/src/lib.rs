//! # eosio-abi
//!
//! ABI-driven conversion between JSON and the EOSIO binary wire format.
//!
//! ## Layers
//!
//! - [`stream`]: byte cursors and variable-length integers
//! - [`Builtin`]: the types every ABI can use without declaring them
//! - [`AbiDocument`]: the ABI as written in `abi.json`
//! - [`TypeTable`]: every type of one ABI resolved up front
//! - [`Contract`]: a loaded ABI with its action and table lookups
//! - [`AbiContext`]: ABIs per contract, the built-in `transaction` and
//!   `abi_def` ABIs, and the last-error slot
//!
//! ## Example
//!
//! ```rust
//! use eosio_abi::AbiContext;
//! use eosio_primitives::Name;
//!
//! let ctx = AbiContext::new().unwrap();
//! let token = Name::new("eosio.token").unwrap();
//! ctx.set_abi(token, r#"{
//!     "structs": [{"name": "transfer", "base": "", "fields": [
//!         {"name": "from", "type": "name"},
//!         {"name": "to", "type": "name"},
//!         {"name": "quantity", "type": "asset"},
//!         {"name": "memo", "type": "string"}
//!     ]}],
//!     "actions": [{"name": "transfer", "type": "transfer"}]
//! }"#).unwrap();
//!
//! let bytes = ctx
//!     .json_to_bin(token, "transfer", r#"{"from":"alice","to":"bob","quantity":"1.0000 SYS","memo":"hi"}"#)
//!     .unwrap();
//! let json = ctx.bin_to_json(token, "transfer", &bytes).unwrap();
//! assert!(json.contains("1.0000 SYS"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod builtin;
pub mod builtin_abis;
mod config;
mod context;
mod contract;
mod convert;
mod document;
mod error;
mod resolver;
pub mod stream;

pub use builtin::Builtin;
pub use config::ContextConfig;
pub use context::{AbiContext, ABI_DEF_TYPE, TRANSACTION_TYPE};
pub use contract::Contract;
pub use convert::{bin_to_json, json_to_bin};
pub use document::{
    AbiDocument, AbiExtension, ActionDef, ActionResultDef, ClausePair, ErrorMessage, FieldDef,
    StructDef, TableDef, TypeDef, VariantDef, ABI_VERSION_PREFIX,
};
pub use error::{AbiError, ErrorKind};
pub use resolver::{Field, Member, ResolvedType, StructType, TypeId, TypeTable, TypeView, VariantType};
