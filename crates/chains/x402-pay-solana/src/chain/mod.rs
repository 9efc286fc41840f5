//! Solana chain primitives used by the prover.
//!
//! - [`Address`] - A base58-encoded Solana public key
//! - [`RpcClientLike`] - The ledger RPC capability: fetching the latest blockhash that
//!   anchors a transfer to a short validity window

pub mod rpc;
pub mod types;

pub use rpc::*;
pub use types::*;
