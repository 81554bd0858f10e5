//! # eosio-sdk
//!
//! Build, sign and broadcast transactions for EOSIO chains.
//!
//! ## Features
//!
//! - **Transaction**: header, actions and the prepare, sign, broadcast flow
//! - **TxBuilder**: Fluent API for building transactions
//! - **Abis**: contract ABIs collected for a transaction, hash-checked
//! - **RpcProvider** / **SignatureProvider**: the chain and key collaborators
//! - **MockRpcProvider** / **SoftkeySignatureProvider**: in-memory implementations
//! - **token**: helpers for the standard token contract
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eosio_abi::AbiContext;
//! use eosio_primitives::{ChainId, Name, TimePoint};
//! use eosio_sdk::{token, Abis, MockRpcProvider, SoftkeySignatureProvider, TxBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ctx = AbiContext::new()?;
//!     let rpc = MockRpcProvider::new(ChainId::default(), 100, TimePoint::from_micros(0));
//!     rpc.add_block(97, 0x1234_5678);
//!     rpc.add_abi(Name::new("eosio.token")?, ctx.serialize_abi(&token::token_abi()?)?);
//!
//!     let signer = SoftkeySignatureProvider::from_strs([
//!         "5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3",
//!     ])?;
//!
//!     let mut trx = TxBuilder::new()
//!         .action(token::transfer(
//!             Name::new("alice")?,
//!             Name::new("bob")?,
//!             "1.0000 SYS".parse()?,
//!             "hi",
//!         )?)
//!         .build();
//!
//!     let mut abis = Abis::new();
//!     let response = trx.sign_and_broadcast(&ctx, &rpc, &signer, &mut abis).await?;
//!     println!("Transaction id: {}", response.transaction_id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod abis;
mod action;
mod config;
mod error;
mod mock;
mod rpc;
mod signer;
pub mod token;
mod transaction;
mod tx_builder;

pub use abis::Abis;
pub use action::{Action, ActionData, PermissionLevel};
pub use config::TxConfig;
pub use error::SdkError;
pub use mock::{MockRpcProvider, NOT_FOUND};
pub use rpc::{
    BlockResponse, InfoResponse, PushTransactionRequest, PushTransactionResponse, RawAbiResponse,
    RpcProvider,
};
pub use signer::{signing_digest, SignatureProvider, SignatureRequest, SoftkeySignatureProvider};
pub use transaction::{SignedTransaction, Transaction, TransactionExtension};
pub use tx_builder::TxBuilder;
