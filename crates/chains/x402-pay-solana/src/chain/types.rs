use serde::{Deserialize, Deserializer, Serialize, Serializer};
use solana_pubkey::Pubkey;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A Solana public key address.
///
/// This is a wrapper around [`Pubkey`] that serializes as a base58-encoded string,
/// the form used in payment challenges.
///
/// # Example
///
/// ```
/// use x402_pay_solana::Address;
/// use std::str::FromStr;
///
/// let addr = Address::from_str("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM").unwrap();
/// assert_eq!(addr.to_string(), "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM");
/// ```
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Address(Pubkey);

impl Address {
    pub const fn new(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }

    pub fn pubkey(&self) -> &Pubkey {
        &self.0
    }
}

/// The string is not a base58-encoded 32-byte public key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to decode Solana address: {0:?}")]
pub struct AddressParseError(pub String);

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Self(pubkey)
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pubkey = Pubkey::from_str(s).map_err(|_| AddressParseError(s.to_string()))?;
        Ok(Self(pubkey))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_address() {
        let addr = Address::from_str("11111111111111111111111111111111").unwrap();
        assert_eq!(addr.pubkey(), &Pubkey::default());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Address::from_str("ADDR1").is_err());
        assert!(Address::from_str("").is_err());
        // '0' is not in the base58 alphabet
        assert!(Address::from_str("0WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM").is_err());
    }

    #[test]
    fn test_serde_as_base58_string() {
        let addr = Address::new(Pubkey::new_from_array([3u8; 32]));
        let json = serde_json::to_string(&addr).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
        assert!(serde_json::from_str::<Address>("\"not-an-address\"").is_err());
    }
}
