#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the pay-per-request retry protocol.
//!
//! A server answers a request for a paid resource with `402 Payment Required` and a
//! JSON [`PaymentChallenge`] body. The client pays (signs a transfer), derives a
//! [`ProofToken`] from the signature and re-issues the original request with the token
//! attached under [`PROOF_HEADER`].
//!
//! This crate is chain- and transport-agnostic. It only defines what flows between the
//! pieces:
//!
//! - [`challenge`] - the 402 response body
//! - [`proof`] - the proof token and the header it travels in
//! - [`error`] - the [`PaymentError`] taxonomy shared by every implementation
//! - [`provider`] - the [`ProofProvider`] seam a chain crate implements
//! - [`observer`] - lifecycle notifications for a payment cycle
//! - [`config`] - configuration helpers (environment-variable resolution)
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing instrumentation

pub mod challenge;
pub mod config;
pub mod error;
pub mod observer;
pub mod proof;
pub mod provider;

pub use challenge::PaymentChallenge;
pub use error::PaymentError;
pub use observer::{PaymentCallbacks, PaymentObserver};
pub use proof::{PROOF_HEADER, ProofToken};
pub use provider::ProofProvider;
