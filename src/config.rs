//! Configuration for the `x402-pay` command.
//!
//! Values come from three places, highest precedence first: command-line flags (which
//! clap also fills from environment variables), an optional JSON config file, and
//! built-in defaults. The config file may reference environment variables instead of
//! holding secrets directly:
//!
//! ```json
//! {
//!   "rpcUrl": "${SOLANA_RPC_URL}",
//!   "keypair": "$SOLANA_PRIVATE_KEY",
//!   "maxLamports": 10000000
//! }
//! ```

use clap::Parser;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use solana_keypair::Keypair;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;
use x402_pay_solana::SolanaCluster;
use x402_pay_types::config::LiteralOrEnv;

/// CLI arguments for the paying HTTP client.
#[derive(Parser, Debug)]
#[command(name = "x402-pay")]
#[command(about = "Fetch a URL, paying HTTP 402 challenges with a Solana wallet")]
#[command(version)]
pub struct CliArgs {
    /// URL to request
    pub url: Url,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: Method,

    /// Extra request header as "Name: value", may be repeated
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(short, long)]
    pub data: Option<String>,

    /// Path to the JSON configuration file
    #[arg(short, long, env = "X402_PAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Solana RPC endpoint used to fetch the recent blockhash
    #[arg(long, env = "SOLANA_RPC_URL")]
    pub rpc_url: Option<Url>,

    /// Well-known cluster whose public RPC endpoint to use, when no RPC URL is set
    #[arg(long)]
    pub cluster: Option<SolanaCluster>,

    /// Base58-encoded payer keypair (64 bytes)
    #[arg(long, env = "SOLANA_PRIVATE_KEY", hide_env_values = true)]
    pub keypair: Option<String>,

    /// Refuse to pay challenges priced above this many lamports
    #[arg(long, env = "X402_PAY_MAX_LAMPORTS")]
    pub max_lamports: Option<u64>,
}

/// Contents of the optional JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    rpc_url: Option<LiteralOrEnv<Url>>,
    #[serde(default)]
    cluster: Option<SolanaCluster>,
    #[serde(default)]
    keypair: Option<LiteralOrEnv<String>>,
    #[serde(default)]
    max_lamports: Option<u64>,
}

/// Fully resolved configuration for one invocation.
pub struct Config {
    pub url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub rpc_url: Url,
    /// `None` runs the client without a wallet: free resources work, paid ones fail.
    pub keypair: Option<Keypair>,
    pub max_lamports: Option<u64>,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Invalid header {0:?}, expected \"Name: value\"")]
    InvalidHeader(String),
    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),
}

impl Config {
    /// Load configuration from CLI arguments, the environment and the config file.
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        let file = match &cli_args.config {
            Some(path) => ConfigFile::load_from_path(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(cli_args, file)
    }

    /// Merges CLI arguments over the config file.
    ///
    /// RPC endpoint precedence: `--rpc-url`, `--cluster`, file `rpcUrl`, file `cluster`,
    /// then devnet.
    pub fn resolve(cli_args: CliArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        let rpc_url = match (cli_args.rpc_url, cli_args.cluster) {
            (Some(url), _) => url,
            (None, Some(cluster)) => Url::parse(cluster.rpc_url())?,
            (None, None) => match (file.rpc_url, file.cluster) {
                (Some(url), _) => url.into_inner(),
                (None, cluster) => Url::parse(cluster.unwrap_or_default().rpc_url())?,
            },
        };

        let keypair = cli_args
            .keypair
            .or_else(|| file.keypair.map(LiteralOrEnv::into_inner))
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_keypair(&s))
            .transpose()?;

        let headers = parse_headers(&cli_args.headers)?;

        Ok(Config {
            url: cli_args.url,
            method: cli_args.method,
            headers,
            body: cli_args.data,
            rpc_url,
            keypair,
            max_lamports: cli_args.max_lamports.or(file.max_lamports),
        })
    }
}

impl ConfigFile {
    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        let config: ConfigFile = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// Decodes a base58 64-byte secret key, as exported by `solana-keygen` wallets.
pub fn parse_keypair(encoded: &str) -> Result<Keypair, ConfigError> {
    let bytes = bs58::decode(encoded.trim())
        .into_vec()
        .map_err(|e| ConfigError::InvalidKeypair(e.to_string()))?;
    Keypair::try_from(bytes.as_slice()).map_err(|e| ConfigError::InvalidKeypair(e.to_string()))
}

/// Parses curl-style `Name: value` header lines.
pub fn parse_headers(lines: &[String]) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidHeader(line.clone()))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(line.clone()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| ConfigError::InvalidHeader(line.clone()))?;
        headers.append(name, value);
    }
    Ok(headers)
}
