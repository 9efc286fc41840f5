#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Solana proof-of-payment for the pay-per-request retry protocol.
//!
//! When a server answers with `402 Payment Required`, the client has to pay the price
//! named in the challenge and prove it. On Solana the payment is a plain System Program
//! SOL transfer from the payer's wallet to the challenge's payout address, and the proof
//! is the base58 text of the wallet's signature over that transfer.
//!
//! # Architecture
//!
//! - [`chain`] - Solana address type and the ledger RPC capability ([`RpcClientLike`])
//! - [`networks`] - Well-known clusters and their public RPC endpoints
//! - [`wallet`] - The wallet capability ([`WalletLike`]) and a [`SignerWallet`] adapter
//!   for local keypairs
//! - [`transfer`] - Construction of the single-instruction transfer transaction
//! - [`prover`] - [`SolanaTransferProver`], the [`ProofProvider`] implementation
//!
//! The wallet and the RPC client are injected, so both can be replaced by test doubles
//! or by bindings to an external wallet.
//!
//! # Example
//!
//! ```rust,no_run
//! use solana_keypair::Keypair;
//! use x402_pay_solana::{SignerWallet, SolanaTransferProver};
//!
//! let prover = SolanaTransferProver::devnet()
//!     .with_wallet(SignerWallet::new(Keypair::new()))
//!     .with_max_lamports(10_000_000);
//! ```
//!
//! # Feature Flags
//!
//! - `telemetry` - Tracing instrumentation of the payment steps
//!
//! [`ProofProvider`]: x402_pay_types::ProofProvider

pub mod chain;
pub mod networks;
pub mod prover;
pub mod transfer;
pub mod wallet;

pub use chain::{Address, AddressParseError, RpcClientLike};
pub use networks::{DEFAULT_RPC_URL, SolanaCluster};
pub use prover::SolanaTransferProver;
pub use wallet::{SignerWallet, WalletError, WalletLike};
