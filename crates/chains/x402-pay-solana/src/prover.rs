//! Proof-of-payment acquisition on Solana.
//!
//! [`SolanaTransferProver`] turns a [`PaymentChallenge`] into a [`ProofToken`]:
//!
//! 1. Resolve the wallet (fail with `WalletUnavailable` if none was injected)
//! 2. Connect it if it is not connected yet
//! 3. Read the payer's public key
//! 4. Parse the payout address from the challenge
//! 5. Fetch the latest blockhash from the RPC
//! 6. Build a single-instruction transfer of `priceLamports` to the payout address
//! 7. Have the wallet sign it
//! 8. Encode the fee payer signature as base58
//!
//! Each step maps its failure into [`PaymentError`] and stops. Nothing is retried.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use std::sync::Arc;
use x402_pay_types::{PaymentChallenge, PaymentError, ProofProvider, ProofToken};

#[cfg(feature = "telemetry")]
use tracing::{debug, instrument};

use crate::chain::{Address, RpcClientLike};
use crate::networks::DEFAULT_RPC_URL;
use crate::transfer::{build_transfer_transaction, fee_payer_signature};
use crate::wallet::WalletLike;

/// Pays challenges with a SOL transfer signed by an injected wallet.
///
/// The wallet is optional: a prover without one still works as a [`ProofProvider`], it
/// just rejects every challenge with [`PaymentError::WalletUnavailable`]. This lets a
/// client be wired up before a wallet is available and still reach free resources.
pub struct SolanaTransferProver<R> {
    wallet: Option<Arc<dyn WalletLike>>,
    rpc_client: R,
    max_lamports: Option<u64>,
}

impl SolanaTransferProver<Arc<RpcClient>> {
    /// A prover talking to the public devnet RPC endpoint.
    pub fn devnet() -> Self {
        Self::from_rpc_url(DEFAULT_RPC_URL)
    }

    /// A prover talking to the RPC endpoint at `rpc_url`.
    pub fn from_rpc_url<U: Into<String>>(rpc_url: U) -> Self {
        Self::new(Arc::new(RpcClient::new(rpc_url.into())))
    }
}

impl<R> SolanaTransferProver<R> {
    pub fn new(rpc_client: R) -> Self {
        Self {
            wallet: None,
            rpc_client,
            max_lamports: None,
        }
    }

    /// Sets the wallet that pays and signs.
    pub fn with_wallet<W: WalletLike + 'static>(mut self, wallet: W) -> Self {
        self.wallet = Some(Arc::new(wallet));
        self
    }

    /// Refuses to pay challenges priced above `limit` lamports.
    ///
    /// The check happens before the wallet is touched.
    pub fn with_max_lamports(mut self, limit: u64) -> Self {
        self.max_lamports = Some(limit);
        self
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }
}

#[async_trait]
impl<R> ProofProvider for SolanaTransferProver<R>
where
    R: RpcClientLike + Send + Sync,
{
    #[cfg_attr(feature = "telemetry", instrument(name = "x402.solana.prove", skip_all, err, fields(
        service_id = %challenge.service_id,
        payout = %challenge.payout_address,
        lamports = challenge.price_lamports,
    )))]
    async fn prove(&self, challenge: &PaymentChallenge) -> Result<ProofToken, PaymentError> {
        if let Some(limit) = self.max_lamports {
            if challenge.price_lamports > limit {
                return Err(PaymentError::PriceAboveLimit {
                    requested: challenge.price_lamports,
                    limit,
                });
            }
        }

        let wallet = self
            .wallet
            .as_ref()
            .ok_or(PaymentError::WalletUnavailable)?;

        if !wallet.is_connected() {
            #[cfg(feature = "telemetry")]
            debug!("Wallet not connected, requesting connection");
            wallet
                .connect()
                .await
                .map_err(|e| PaymentError::WalletConnectionRejected(e.to_string()))?;
        }
        let payer = wallet.pubkey().ok_or_else(|| {
            PaymentError::WalletConnectionRejected("wallet reported no public key".to_string())
        })?;

        let payout = challenge
            .payout_address
            .parse::<Address>()
            .map_err(|e| PaymentError::InvalidPayoutAddress(e.to_string()))?;

        let recent_blockhash = self
            .rpc_client
            .get_latest_blockhash()
            .await
            .map_err(|e| PaymentError::LedgerRpc(e.to_string()))?;

        let transaction = build_transfer_transaction(
            &payer,
            payout.pubkey(),
            challenge.price_lamports,
            recent_blockhash,
        )?;

        #[cfg(feature = "telemetry")]
        debug!(%payer, %recent_blockhash, "Requesting wallet signature");

        let signed = wallet
            .sign_transaction(transaction)
            .await
            .map_err(|e| PaymentError::SigningRejected(e.to_string()))?;
        let signature = fee_payer_signature(&signed)?;

        Ok(ProofToken::from_signature_bytes(signature))
    }
}
