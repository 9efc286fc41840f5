//! Client-side payment handling for reqwest.
//!
//! This module provides the [`X402Client`] which intercepts `402 Payment Required`
//! responses, drives a [`ProofProvider`] through one payment cycle, and re-issues the
//! original request with the resulting proof.

use http::{Extensions, HeaderValue, StatusCode};
use reqwest::{Request, Response};
use reqwest_middleware as rqm;
use x402_pay_types::{
    PROOF_HEADER, PaymentCallbacks, PaymentChallenge, PaymentError, PaymentObserver,
    ProofProvider, ProofToken,
};

#[cfg(feature = "telemetry")]
use tracing::{debug, info, instrument, trace, warn};

/// The pay-per-request middleware.
///
/// The [`X402Client`] acts as middleware for reqwest. A response other than 402 passes
/// through untouched. A 402 response triggers exactly one payment cycle and exactly one
/// retry of the original request, whose response is returned verbatim (even if it is
/// another 402).
///
/// ## Creating an X402Client
///
/// ```rust,no_run
/// use x402_pay_reqwest::X402Client;
/// use x402_pay_solana::SolanaTransferProver;
///
/// let client = X402Client::new(SolanaTransferProver::devnet());
/// ```
///
/// ## Using with Reqwest
///
/// See the [`ReqwestWithPayments`](crate::ReqwestWithPayments) trait for integrating
/// with reqwest.
pub struct X402Client<P, O = PaymentCallbacks> {
    provider: P,
    observer: O,
}

impl<P> X402Client<P, PaymentCallbacks> {
    /// Creates a new [`X402Client`] paying through `provider`, with no callbacks set.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            observer: PaymentCallbacks::default(),
        }
    }

    /// Called when a 402 challenge is received, before anything is paid.
    pub fn on_payment_start<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observer = self.observer.with_on_start(f);
        self
    }

    /// Called with the proof once the payment has been signed.
    pub fn on_payment_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProofToken) + Send + Sync + 'static,
    {
        self.observer = self.observer.with_on_success(f);
        self
    }

    /// Called with the error when the payment cycle fails.
    pub fn on_payment_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&PaymentError) + Send + Sync + 'static,
    {
        self.observer = self.observer.with_on_error(f);
        self
    }
}

impl<P, O> X402Client<P, O> {
    /// Replaces the observer with a custom [`PaymentObserver`].
    ///
    /// Closures registered earlier through `on_payment_*` are discarded.
    pub fn with_observer<O2: PaymentObserver>(self, observer: O2) -> X402Client<P, O2> {
        X402Client {
            provider: self.provider,
            observer,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P, O> X402Client<P, O>
where
    P: ProofProvider,
    O: PaymentObserver,
{
    /// Runs one payment cycle over the body of a 402 response.
    ///
    /// Notifies `on_payment_start`, parses the challenge, pays it through the provider,
    /// then notifies exactly one of `on_payment_success` or `on_payment_error`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MalformedChallenge`] if the body is not a valid challenge,
    /// or whatever the provider failed with.
    #[cfg_attr(feature = "telemetry", instrument(name = "x402.reqwest.acquire_proof", skip_all, err))]
    pub async fn acquire_proof(&self, body: &[u8]) -> Result<ProofToken, PaymentError> {
        self.observer.on_payment_start();
        let result = self.pay(body).await;
        match &result {
            Ok(proof) => self.observer.on_payment_success(proof),
            Err(error) => {
                #[cfg(feature = "telemetry")]
                warn!(%error, "Payment failed");
                self.observer.on_payment_error(error)
            }
        }
        result
    }

    async fn pay(&self, body: &[u8]) -> Result<ProofToken, PaymentError> {
        let challenge = PaymentChallenge::from_slice(body)?;

        #[cfg(feature = "telemetry")]
        debug!(
            service_id = %challenge.service_id,
            price_lamports = challenge.price_lamports,
            message = %challenge.message,
            "Parsed payment challenge"
        );

        self.provider.prove(&challenge).await
    }
}

#[async_trait::async_trait]
impl<P, O> rqm::Middleware for X402Client<P, O>
where
    P: ProofProvider + 'static,
    O: PaymentObserver + 'static,
{
    /// Handles a request, automatically paying 402 responses.
    ///
    /// When a 402 response is received, this middleware:
    /// 1. Reads the payment challenge from the response body
    /// 2. Acquires a proof of payment through the provider
    /// 3. Retries the request once with the proof header
    #[cfg_attr(feature = "telemetry", instrument(name = "x402.reqwest.handle", skip_all, err))]
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: rqm::Next<'_>,
    ) -> rqm::Result<Response> {
        let retry_req = req.try_clone();
        let res = next.clone().run(req, extensions).await?;

        if res.status() != StatusCode::PAYMENT_REQUIRED {
            #[cfg(feature = "telemetry")]
            trace!(status = ?res.status(), "No payment required, returning response");
            return Ok(res);
        }

        #[cfg(feature = "telemetry")]
        info!(url = %res.url(), "Received 402 Payment Required, processing payment");

        // Nothing may be paid for a request that cannot be sent again.
        let mut retry = retry_req.ok_or(rqm::Error::Middleware(
            PaymentError::RequestNotCloneable.into(),
        ))?;

        let body = res.bytes().await?;
        let proof = self
            .acquire_proof(&body)
            .await
            .map_err(|e| rqm::Error::Middleware(e.into()))?;

        let header_value =
            HeaderValue::from_str(proof.as_str()).map_err(|e| rqm::Error::Middleware(e.into()))?;
        retry.headers_mut().insert(PROOF_HEADER, header_value);

        #[cfg(feature = "telemetry")]
        trace!(url = %retry.url(), "Retrying request with proof of payment");

        next.run(retry, extensions).await
    }
}
