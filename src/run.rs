use dotenvy::dotenv;
use reqwest_middleware as rqm;
use std::error::Error;
use std::io::Write;
use x402_pay_reqwest::{PaymentError, ReqwestWithPayments, ReqwestWithPaymentsBuild, X402Client};
use x402_pay_solana::{SignerWallet, SolanaTransferProver};
use x402_pay_types::ProofToken;

use crate::config::Config;
use crate::telemetry::Telemetry;

/// Fetches the configured URL, paying a 402 challenge if one comes back.
///
/// - Loads `.env` variables.
/// - Initializes logging.
/// - Resolves configuration from flags, environment and the optional config file.
/// - Sends the request through the paying middleware and prints the outcome.
pub async fn run() -> Result<(), Box<dyn Error>> {
    // Load .env variables
    dotenv().ok();

    Telemetry::new().register();

    let config = Config::load()?;

    let prover = SolanaTransferProver::from_rpc_url(config.rpc_url.as_str());
    let prover = match config.keypair {
        Some(keypair) => prover.with_wallet(SignerWallet::new(keypair)),
        None => {
            tracing::warn!("No keypair configured, payment challenges will be rejected");
            prover
        }
    };
    let prover = match config.max_lamports {
        Some(limit) => prover.with_max_lamports(limit),
        None => prover,
    };

    let x402_client = X402Client::new(prover)
        .on_payment_start(|| tracing::info!("Payment required, paying challenge"))
        .on_payment_success(|proof: &ProofToken| tracing::info!(%proof, "Payment signed"))
        .on_payment_error(|error: &PaymentError| tracing::error!(%error, "Payment failed"));

    let http_client = reqwest::Client::new().with_payments(x402_client).build();

    let mut request = http_client
        .request(config.method, config.url)
        .headers(config.headers);
    if let Some(body) = config.body {
        request = request.body(body);
    }

    let response = request.send().await.map_err(describe)?;

    eprintln!("{:?} {}", response.version(), response.status());
    let body = response.bytes().await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&body)?;
    stdout.flush()?;

    Ok(())
}

/// Surfaces the payment error itself rather than the middleware wrapper around it.
fn describe(error: rqm::Error) -> Box<dyn Error> {
    match error {
        rqm::Error::Middleware(inner) => match inner.downcast::<PaymentError>() {
            Ok(payment_error) => Box::new(payment_error),
            Err(other) => other.into(),
        },
        rqm::Error::Reqwest(e) => Box::new(e),
    }
}
