use reqwest::{Client, ClientBuilder};
use reqwest_middleware as rqm;
use std::sync::Arc;

use crate::client::X402Client;

/// A reqwest value that a middleware client can be assembled from.
///
/// A [`Client`] is used as-is. A [`ClientBuilder`] is built first, so assembling from it
/// can fail with [`reqwest::Error`].
pub trait PaymentsBase: Sized {
    type Output<T>;

    fn with_client<T>(self, f: impl FnOnce(Client) -> T) -> Self::Output<T>;

    fn map_output<T, U>(output: Self::Output<T>, f: impl FnOnce(T) -> U) -> Self::Output<U>;
}

impl PaymentsBase for Client {
    type Output<T> = T;

    fn with_client<T>(self, f: impl FnOnce(Client) -> T) -> Self::Output<T> {
        f(self)
    }

    fn map_output<T, U>(output: Self::Output<T>, f: impl FnOnce(T) -> U) -> Self::Output<U> {
        f(output)
    }
}

impl PaymentsBase for ClientBuilder {
    type Output<T> = Result<T, reqwest::Error>;

    fn with_client<T>(self, f: impl FnOnce(Client) -> T) -> Self::Output<T> {
        self.build().map(f)
    }

    fn map_output<T, U>(output: Self::Output<T>, f: impl FnOnce(T) -> U) -> Self::Output<U> {
        output.map(f)
    }
}

/// Attaches an [`X402Client`] to a reqwest [`Client`] or [`ClientBuilder`].
pub trait ReqwestWithPayments: PaymentsBase {
    fn with_payments<P, O>(
        self,
        x402_client: X402Client<P, O>,
    ) -> ReqwestWithPaymentsBuilder<Self, P, O> {
        ReqwestWithPaymentsBuilder {
            inner: self,
            x402_client,
            outer: Vec::new(),
            nested: Vec::new(),
        }
    }
}

impl<A: PaymentsBase> ReqwestWithPayments for A {}

/// Collects the payment middleware and any middleware stacked around it.
pub struct ReqwestWithPaymentsBuilder<A, P, O> {
    inner: A,
    x402_client: X402Client<P, O>,
    outer: Vec<Arc<dyn rqm::Middleware>>,
    nested: Vec<Arc<dyn rqm::Middleware>>,
}

impl<A, P, O> ReqwestWithPaymentsBuilder<A, P, O> {
    /// Adds middleware in front of the payment step.
    ///
    /// It sees the caller's request once and the final response, paid or not.
    pub fn with_outer<M: rqm::Middleware>(mut self, middleware: M) -> Self {
        self.outer.push(Arc::new(middleware));
        self
    }

    /// Adds middleware behind the payment step.
    ///
    /// It runs for the original request and again for the retry carrying the proof.
    pub fn with_nested<M: rqm::Middleware>(mut self, middleware: M) -> Self {
        self.nested.push(Arc::new(middleware));
        self
    }
}

pub trait ReqwestWithPaymentsBuild {
    type BuildResult;
    type BuilderResult;

    fn build(self) -> Self::BuildResult;
    fn builder(self) -> Self::BuilderResult;
}

impl<A, P, O> ReqwestWithPaymentsBuild for ReqwestWithPaymentsBuilder<A, P, O>
where
    A: PaymentsBase,
    X402Client<P, O>: rqm::Middleware,
{
    type BuildResult = A::Output<rqm::ClientWithMiddleware>;
    type BuilderResult = A::Output<rqm::ClientBuilder>;

    fn build(self) -> Self::BuildResult {
        A::map_output(self.builder(), |builder: rqm::ClientBuilder| builder.build())
    }

    fn builder(self) -> Self::BuilderResult {
        let Self {
            inner,
            x402_client,
            outer,
            nested,
        } = self;
        inner.with_client(move |client| {
            let builder = outer
                .into_iter()
                .fold(rqm::ClientBuilder::new(client), rqm::ClientBuilder::with_arc)
                .with(x402_client);
            nested.into_iter().fold(builder, rqm::ClientBuilder::with_arc)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::Extensions;
    use reqwest::{Request, Response};
    use std::sync::Mutex;
    use wiremock::matchers::{header, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use x402_pay_types::{PROOF_HEADER, PaymentChallenge, PaymentError, ProofProvider, ProofToken};

    struct FixedProof;

    #[async_trait]
    impl ProofProvider for FixedProof {
        async fn prove(&self, _: &PaymentChallenge) -> Result<ProofToken, PaymentError> {
            Ok(ProofToken::from_signature_bytes([9u8; 64]))
        }
    }

    /// Records, per request seen, whether it carried a proof.
    #[derive(Clone, Default)]
    struct Tap(Arc<Mutex<Vec<bool>>>);

    impl Tap {
        fn seen(&self) -> Vec<bool> {
            self.0.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl rqm::Middleware for Tap {
        async fn handle(
            &self,
            req: Request,
            extensions: &mut Extensions,
            next: rqm::Next<'_>,
        ) -> rqm::Result<Response> {
            self.0
                .lock()
                .unwrap()
                .push(req.headers().contains_key(PROOF_HEADER));
            next.run(req, extensions).await
        }
    }

    async fn paywall() -> MockServer {
        let server = MockServer::start().await;
        let proof = ProofToken::from_signature_bytes([9u8; 64]);
        Mock::given(path("/x"))
            .and(header(PROOF_HEADER, proof.as_str()))
            .respond_with(ResponseTemplate::new(200))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(path("/x"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "requiresPayment": true,
                "serviceId": "svc",
                "wallet": "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
                "priceLamports": 1,
                "message": "pay"
            })))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_outer_and_nested_middleware_placement() {
        let server = paywall().await;
        let (outer, nested) = (Tap::default(), Tap::default());
        let client = Client::new()
            .with_payments(X402Client::new(FixedProof))
            .with_outer(outer.clone())
            .with_nested(nested.clone())
            .build();

        let res = client
            .get(format!("{}/x", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(outer.seen(), vec![false], "outer sees the caller's request once");
        assert_eq!(nested.seen(), vec![false, true], "nested sees the retry too");
    }

    #[tokio::test]
    async fn test_client_builder_base_builds_fallibly() {
        let server = paywall().await;
        let client = ClientBuilder::new()
            .with_payments(X402Client::new(FixedProof))
            .build()
            .unwrap();

        let res = client
            .get(format!("{}/x", server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
