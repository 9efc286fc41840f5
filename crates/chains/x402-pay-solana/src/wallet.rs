//! The wallet capability.
//!
//! A wallet is whatever holds the payer's key: a browser extension behind a binding, a
//! hardware device, or a local keypair. The prover only needs four things from it:
//! whether it is connected, a way to connect, the payer's public key, and a way to sign
//! a transaction. [`WalletLike`] captures exactly that.
//!
//! [`SignerWallet`] adapts any [`Signer`] (such as a `solana_keypair::Keypair`) into an
//! always-connected wallet.

use async_trait::async_trait;
use solana_pubkey::Pubkey;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::versioned::VersionedTransaction;
use std::sync::Arc;

/// Errors reported by a wallet.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The user declined the request in the wallet UI.
    #[error("User rejected the request")]
    UserRejected,
    /// The transaction does not list the wallet's key among its required signers.
    #[error("Wallet key is not a required signer of the transaction")]
    NotASigner,
    /// Any other wallet-side failure.
    #[error("{0}")]
    Other(String),
}

/// Access to the payer's wallet.
///
/// Calls are made in a fixed order per payment: `is_connected`, then `connect` if it
/// returned false, then `pubkey`, then `sign_transaction` exactly once.
#[async_trait]
pub trait WalletLike: Send + Sync {
    /// Whether the wallet is ready to report its key and sign.
    fn is_connected(&self) -> bool;

    /// Asks the wallet (or its user) to connect.
    async fn connect(&self) -> Result<(), WalletError>;

    /// The payer's public key, if connected.
    fn pubkey(&self) -> Option<Pubkey>;

    /// Signs the transaction as its fee payer and returns it with the signature in place.
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError>;
}

#[async_trait]
impl<T: WalletLike + ?Sized> WalletLike for Arc<T> {
    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    async fn connect(&self) -> Result<(), WalletError> {
        (**self).connect().await
    }

    fn pubkey(&self) -> Option<Pubkey> {
        (**self).pubkey()
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        (**self).sign_transaction(transaction).await
    }
}

/// A wallet backed by a local [`Signer`]. Always connected.
#[derive(Clone)]
pub struct SignerWallet<S> {
    signer: S,
}

impl<S> SignerWallet<S> {
    pub fn new(signer: S) -> Self {
        Self { signer }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }
}

#[async_trait]
impl<S: Signer + Send + Sync> WalletLike for SignerWallet<S> {
    fn is_connected(&self) -> bool {
        true
    }

    async fn connect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    fn pubkey(&self) -> Option<Pubkey> {
        self.signer.try_pubkey().ok()
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, WalletError> {
        sign_with_signer(&self.signer, transaction)
    }
}

/// Places `signer`'s signature into the slot matching its position among the required
/// signers of the message.
pub fn sign_with_signer<S: Signer + ?Sized>(
    signer: &S,
    mut tx: VersionedTransaction,
) -> Result<VersionedTransaction, WalletError> {
    let pubkey = signer
        .try_pubkey()
        .map_err(|e| WalletError::Other(format!("{e}")))?;
    let num_required = tx.message.header().num_required_signatures as usize;
    let position = tx
        .message
        .static_account_keys()
        .iter()
        .take(num_required)
        .position(|key| *key == pubkey)
        .ok_or(WalletError::NotASigner)?;

    let msg_bytes = tx.message.serialize();
    let signature = signer
        .try_sign_message(msg_bytes.as_slice())
        .map_err(|e| WalletError::Other(format!("{e}")))?;

    if tx.signatures.len() < num_required {
        tx.signatures.resize(num_required, Signature::default());
    }
    tx.signatures[position] = signature;
    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::build_transfer_transaction;
    use solana_keypair::Keypair;
    use solana_message::Hash;

    #[tokio::test]
    async fn test_signer_wallet_signs_as_fee_payer() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let wallet = SignerWallet::new(keypair);
        assert!(wallet.is_connected());
        assert_eq!(wallet.pubkey(), Some(payer));

        let to = Pubkey::new_from_array([9u8; 32]);
        let tx = build_transfer_transaction(&payer, &to, 1_000, Hash::default()).unwrap();
        let signed = wallet.sign_transaction(tx).await.unwrap();

        assert_eq!(signed.signatures.len(), 1);
        let message_bytes = signed.message.serialize();
        assert!(signed.signatures[0].verify(payer.as_ref(), &message_bytes));
    }

    #[tokio::test]
    async fn test_signer_wallet_refuses_foreign_transaction() {
        let wallet = SignerWallet::new(Keypair::new());
        let someone_else = Pubkey::new_from_array([1u8; 32]);
        let to = Pubkey::new_from_array([2u8; 32]);
        let tx = build_transfer_transaction(&someone_else, &to, 1, Hash::default()).unwrap();
        let err = wallet.sign_transaction(tx).await.unwrap_err();
        assert!(matches!(err, WalletError::NotASigner));
    }
}
