#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Reqwest middleware for transparent pay-per-request handling.
//!
//! This crate provides an [`X402Client`] that can be used as a `reqwest` middleware
//! to automatically handle `402 Payment Required` responses. When a request receives
//! a 402 response, the middleware parses the payment challenge from the body, asks a
//! [`ProofProvider`] to pay it, and retries the original request once with the proof
//! attached under the `x-tx-signature` header.
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use x402_pay_reqwest::{ReqwestWithPayments, ReqwestWithPaymentsBuild, X402Client};
//! use x402_pay_solana::{SignerWallet, SolanaTransferProver};
//! use solana_keypair::Keypair;
//! use reqwest::Client;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let prover = SolanaTransferProver::devnet()
//!     .with_wallet(SignerWallet::new(Keypair::new()));
//! let x402_client = X402Client::new(prover)
//!     .on_payment_success(|proof| println!("Paid, proof {proof}"));
//!
//! // Build a reqwest client with x402 middleware
//! let http_client = Client::new()
//!     .with_payments(x402_client)
//!     .build();
//!
//! // Use the client - payments are handled automatically
//! let response = http_client
//!     .get("https://api.example.com/protected")
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing Payments
//!
//! Register closures with [`X402Client::on_payment_start`],
//! [`X402Client::on_payment_success`] and [`X402Client::on_payment_error`], or install any
//! [`PaymentObserver`] with [`X402Client::with_observer`].
//!
//! ## Errors
//!
//! Payment failures surface as [`reqwest_middleware::Error::Middleware`] wrapping a
//! [`PaymentError`]; use `downcast_ref` to recover it. Transport failures stay
//! [`reqwest_middleware::Error::Reqwest`].
//!
//! [`ProofProvider`]: x402_pay_types::ProofProvider
//! [`PaymentObserver`]: x402_pay_types::PaymentObserver

mod builder;
mod client;

pub use builder::*;
pub use client::*;
pub use x402_pay_types::{PROOF_HEADER, PaymentError};
