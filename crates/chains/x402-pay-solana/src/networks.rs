//! Well-known Solana clusters.
//!
//! Payments default to devnet so that a misconfigured client never spends real SOL.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Public RPC endpoint used when nothing else is configured.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// A Solana cluster with a public RPC endpoint.
///
/// # Example
///
/// ```
/// use x402_pay_solana::SolanaCluster;
///
/// let cluster: SolanaCluster = "mainnet-beta".parse().unwrap();
/// assert_eq!(cluster.rpc_url(), "https://api.mainnet-beta.solana.com");
/// assert_eq!(SolanaCluster::default(), SolanaCluster::Devnet);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolanaCluster {
    #[serde(alias = "mainnet")]
    MainnetBeta,
    #[default]
    Devnet,
    Testnet,
    Localnet,
}

impl SolanaCluster {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            SolanaCluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            SolanaCluster::Devnet => DEFAULT_RPC_URL,
            SolanaCluster::Testnet => "https://api.testnet.solana.com",
            SolanaCluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SolanaCluster::MainnetBeta => "mainnet-beta",
            SolanaCluster::Devnet => "devnet",
            SolanaCluster::Testnet => "testnet",
            SolanaCluster::Localnet => "localnet",
        }
    }
}

/// The string does not name a known cluster.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown Solana cluster {0:?}, expected one of mainnet-beta, devnet, testnet, localnet")]
pub struct UnknownClusterError(pub String);

impl FromStr for SolanaCluster {
    type Err = UnknownClusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet-beta" | "mainnet" => Ok(SolanaCluster::MainnetBeta),
            "devnet" => Ok(SolanaCluster::Devnet),
            "testnet" => Ok(SolanaCluster::Testnet),
            "localnet" | "localhost" => Ok(SolanaCluster::Localnet),
            _ => Err(UnknownClusterError(s.to_string())),
        }
    }
}

impl Display for SolanaCluster {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
