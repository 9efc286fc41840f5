//! The seam between the HTTP retry logic and a concrete ledger.

use async_trait::async_trait;
use std::sync::Arc;

use crate::challenge::PaymentChallenge;
use crate::error::PaymentError;
use crate::proof::ProofToken;

/// Turns a payment challenge into a proof of payment.
///
/// Implementations drive a wallet to sign a transfer matching the challenge and return
/// the encoded signature. They must not retry internally: every failure is returned
/// once, mapped into the [`PaymentError`] taxonomy.
#[async_trait]
pub trait ProofProvider: Send + Sync {
    async fn prove(&self, challenge: &PaymentChallenge) -> Result<ProofToken, PaymentError>;
}

#[async_trait]
impl<T: ProofProvider + ?Sized> ProofProvider for Arc<T> {
    async fn prove(&self, challenge: &PaymentChallenge) -> Result<ProofToken, PaymentError> {
        (**self).prove(challenge).await
    }
}
