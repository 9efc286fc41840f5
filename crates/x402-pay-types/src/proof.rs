//! Proof-of-payment tokens.
//!
//! A [`ProofToken`] is the base58 text form of the payer's signature over the transfer
//! that settles a challenge. It is opaque to the client: it is produced once, attached
//! to the retried request under [`PROOF_HEADER`], and never inspected again.

use std::fmt::{Display, Formatter};

/// Header the proof token is sent in on the retried request.
pub const PROOF_HEADER: &str = "x-tx-signature";

/// The encoded signature presented on retry as evidence of payment.
///
/// # Example
///
/// ```rust
/// use x402_pay_types::ProofToken;
///
/// let proof = ProofToken::from_signature_bytes([1u8, 2, 3]);
/// assert_eq!(proof.as_str(), "Ldp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProofToken(String);

impl ProofToken {
    /// Encodes raw signature bytes into a proof token.
    pub fn from_signature_bytes<T: AsRef<[u8]>>(signature: T) -> Self {
        Self(bs58::encode(signature.as_ref()).into_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for ProofToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ProofToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
