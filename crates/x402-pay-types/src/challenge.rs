//! The payment challenge carried by a `402 Payment Required` response.
//!
//! The challenge is the JSON body of the 402 response:
//!
//! ```json
//! {
//!   "requiresPayment": true,
//!   "serviceId": "weather-api",
//!   "wallet": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
//!   "priceLamports": 5000000,
//!   "message": "Pay 0.005 SOL to access this endpoint"
//! }
//! ```
//!
//! A challenge only makes sense as the answer to the single request that produced it.
//! It is parsed, used for one payment, and dropped.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::error::PaymentError;

/// Payment terms demanded by the server for one request.
///
/// The payout address is kept as the raw string the server sent; resolving it into a
/// chain-native address is the job of the [`ProofProvider`](crate::ProofProvider), which
/// reports a malformed address as [`PaymentError::InvalidPayoutAddress`].
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentChallenge {
    /// Expected `true`. Missing means `true`, and `false` is logged but not enforced.
    #[serde(default = "requires_payment_default")]
    pub requires_payment: bool,
    /// Opaque identifier of the billed resource.
    #[serde(default)]
    pub service_id: String,
    /// Destination account, as a base58 string.
    #[serde(rename = "wallet")]
    pub payout_address: String,
    /// Amount in lamports. Accepted as a JSON number or a decimal string.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub price_lamports: u64,
    /// Human-readable note for the payer.
    #[serde(default)]
    pub message: String,
}

fn requires_payment_default() -> bool {
    true
}

impl PaymentChallenge {
    /// Parses a challenge from a 402 response body.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MalformedChallenge`] if the body is not a challenge.
    /// A 402 that says `"requiresPayment": false` is still treated as a challenge.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "x402.challenge.parse", skip_all, err)
    )]
    pub fn from_slice(body: &[u8]) -> Result<Self, PaymentError> {
        let challenge: PaymentChallenge = serde_json::from_slice(body)
            .map_err(|e| PaymentError::MalformedChallenge(e.to_string()))?;
        #[cfg(feature = "telemetry")]
        if !challenge.requires_payment {
            tracing::warn!(
                service_id = %challenge.service_id,
                "402 response says requiresPayment: false, paying anyway"
            );
        }
        Ok(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_challenge() {
        let body = br#"{
            "requiresPayment": true,
            "serviceId": "svc-1",
            "wallet": "ADDR1",
            "priceLamports": 5000000,
            "message": "pay up"
        }"#;
        let challenge = PaymentChallenge::from_slice(body).unwrap();
        assert_eq!(challenge.service_id, "svc-1");
        assert_eq!(challenge.payout_address, "ADDR1");
        assert_eq!(challenge.price_lamports, 5_000_000);
        assert_eq!(challenge.message, "pay up");
    }

    #[test]
    fn test_price_as_string() {
        let body = br#"{"wallet": "ADDR1", "priceLamports": "42"}"#;
        let challenge = PaymentChallenge::from_slice(body).unwrap();
        assert_eq!(challenge.price_lamports, 42);
        assert!(challenge.requires_payment);
        assert!(challenge.message.is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let body = br#"{"wallet": "ADDR1", "priceLamports": 1, "network": "devnet"}"#;
        assert!(PaymentChallenge::from_slice(body).is_ok());
    }

    #[test]
    fn test_requires_payment_false_still_parsed() {
        let body = br#"{"requiresPayment": false, "wallet": "ADDR1", "priceLamports": 1}"#;
        let challenge = PaymentChallenge::from_slice(body).unwrap();
        assert!(!challenge.requires_payment);
        assert_eq!(challenge.payout_address, "ADDR1");
        assert_eq!(challenge.price_lamports, 1);
    }

    #[test]
    fn test_missing_wallet_rejected() {
        let body = br#"{"requiresPayment": true, "priceLamports": 1}"#;
        let err = PaymentChallenge::from_slice(body).unwrap_err();
        assert!(matches!(err, PaymentError::MalformedChallenge(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let body = br#"{"wallet": "ADDR1", "priceLamports": -5}"#;
        let err = PaymentChallenge::from_slice(body).unwrap_err();
        assert!(matches!(err, PaymentError::MalformedChallenge(_)));
    }

    #[test]
    fn test_not_json_rejected() {
        let err = PaymentChallenge::from_slice(b"<html>Payment Required</html>").unwrap_err();
        assert!(matches!(err, PaymentError::MalformedChallenge(_)));
    }

    #[test]
    fn test_serializes_wire_names() {
        let challenge = PaymentChallenge {
            requires_payment: true,
            service_id: "svc".to_string(),
            payout_address: "ADDR1".to_string(),
            price_lamports: 7,
            message: String::new(),
        };
        let json = serde_json::to_value(&challenge).unwrap();
        assert_eq!(json["wallet"], "ADDR1");
        assert_eq!(json["priceLamports"], 7);
        assert_eq!(json["requiresPayment"], true);
    }
}
