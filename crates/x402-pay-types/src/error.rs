//! Errors raised while satisfying a payment challenge.

/// Everything that can go wrong between receiving a 402 and sending the paid retry.
///
/// Transport failures are not part of this taxonomy: they belong to the HTTP client and
/// are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentError {
    /// No wallet capability was provided, so nothing can sign the payment.
    #[error("No wallet available to pay the challenge")]
    WalletUnavailable,
    /// The wallet was not connected and the connection attempt was declined or failed.
    #[error("Wallet connection rejected: {0}")]
    WalletConnectionRejected(String),
    /// The challenge's payout address is not a valid account address.
    #[error("Invalid payout address: {0}")]
    InvalidPayoutAddress(String),
    /// The wallet declined to sign, or signing failed.
    #[error("Signing rejected: {0}")]
    SigningRejected(String),
    /// The 402 body is not a payment challenge.
    #[error("Malformed payment challenge: {0}")]
    MalformedChallenge(String),
    /// The ledger RPC could not provide a recent blockhash.
    #[error("Ledger RPC failed: {0}")]
    LedgerRpc(String),
    /// The transfer transaction could not be assembled.
    #[error("Failed to build transfer transaction: {0}")]
    TransactionBuild(String),
    /// The challenge asks for more than the configured spending limit.
    #[error("Requested price {requested} lamports exceeds the limit of {limit} lamports")]
    PriceAboveLimit { requested: u64, limit: u64 },
    /// The original request has a streaming body and cannot be re-sent with the proof.
    #[error("Request object is not cloneable. Are you passing a streaming body?")]
    RequestNotCloneable,
}
