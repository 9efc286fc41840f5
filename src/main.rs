//! `x402-pay`: a curl-like client for pay-per-request HTTP resources.
//!
//! The request is sent as-is. If the server answers `402 Payment Required` with a
//! payment challenge, the configured Solana keypair pays it with a SOL transfer and the
//! request is sent once more with the transfer signature in the `x-tx-signature` header.
//!
//! The final status line is printed to stderr and the response body to stdout.
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `SOLANA_RPC_URL`, `SOLANA_PRIVATE_KEY`, `X402_PAY_CONFIG`, `X402_PAY_MAX_LAMPORTS`
//!   mirror the command-line flags
//! - `RUST_LOG` controls log verbosity (default `info`)

mod config;
mod run;
mod telemetry;

use std::process;

use crate::run::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1)
    }
}
