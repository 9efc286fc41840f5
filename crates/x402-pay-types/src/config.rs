//! Configuration helpers.
//!
//! Configuration files should not have to contain secrets such as a payer keypair.
//! [`LiteralOrEnv`] lets any string-parsed value be written either literally or as a
//! reference to an environment variable:
//!
//! ```json
//! {
//!   "rpcUrl": "https://api.devnet.solana.com",
//!   "keypair": "$SOLANA_PRIVATE_KEY"
//! }
//! ```
//!
//! Both `$VAR` and `${VAR}` forms are recognised.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::str::FromStr;

/// A value read either literally or from the environment at deserialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(T);

impl<T> LiteralOrEnv<T> {
    pub fn from_literal(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Failure to resolve a `$VAR` reference.
#[derive(Debug, thiserror::Error)]
#[error("Environment variable '{name}' not found (referenced as '{reference}')")]
pub struct EnvReferenceError {
    pub name: String,
    pub reference: String,
}

/// Returns the variable name if `s` is written as `$VAR` or `${VAR}`.
fn env_reference(s: &str) -> Option<&str> {
    if let Some(braced) = s.strip_prefix("${").and_then(|r| r.strip_suffix('}')) {
        return Some(braced);
    }
    let name = s.strip_prefix('$')?;
    let is_name = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
    is_name.then_some(name)
}

/// Resolves `s` against the environment if it is a variable reference.
pub fn resolve_env(s: &str) -> Result<String, EnvReferenceError> {
    match env_reference(s) {
        Some(name) => std::env::var(name).map_err(|_| EnvReferenceError {
            name: name.to_string(),
            reference: s.to_string(),
        }),
        None => Ok(s.to_string()),
    }
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let value = resolve_env(&raw).map_err(serde::de::Error::custom)?;
        value
            .parse::<T>()
            .map(LiteralOrEnv)
            .map_err(|e| serde::de::Error::custom(format!("Failed to parse value: {e}")))
    }
}

impl<T: Serialize> Serialize for LiteralOrEnv<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
