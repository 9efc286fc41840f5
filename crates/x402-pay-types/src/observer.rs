//! Lifecycle notifications for a payment cycle.
//!
//! Every challenge cycle produces `on_payment_start` followed by exactly one of
//! `on_payment_success` or `on_payment_error`. Observers only get shared references:
//! they can log, count or update a UI, but cannot change the outcome of the call.

use std::fmt;
use std::sync::Arc;

use crate::error::PaymentError;
use crate::proof::ProofToken;

/// Receives notifications about a payment cycle.
///
/// All methods default to doing nothing, so implementors only override what they need.
pub trait PaymentObserver: Send + Sync {
    /// Called once a challenge has been received, before any wallet interaction.
    fn on_payment_start(&self) {}

    /// Called after the payment has been signed and the proof derived.
    fn on_payment_success(&self, _proof: &ProofToken) {}

    /// Called when the payment cycle fails, right before the error is returned.
    fn on_payment_error(&self, _error: &PaymentError) {}
}

impl<T: PaymentObserver + ?Sized> PaymentObserver for Arc<T> {
    fn on_payment_start(&self) {
        (**self).on_payment_start()
    }

    fn on_payment_success(&self, proof: &ProofToken) {
        (**self).on_payment_success(proof)
    }

    fn on_payment_error(&self, error: &PaymentError) {
        (**self).on_payment_error(error)
    }
}

type StartFn = Arc<dyn Fn() + Send + Sync>;
type SuccessFn = Arc<dyn Fn(&ProofToken) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&PaymentError) + Send + Sync>;

/// A [`PaymentObserver`] assembled from optional closures.
///
/// # Example
///
/// ```rust
/// use x402_pay_types::{PaymentCallbacks, PaymentObserver, ProofToken};
///
/// let callbacks = PaymentCallbacks::default()
///     .with_on_success(|proof: &ProofToken| println!("paid: {proof}"));
/// callbacks.on_payment_start(); // not set, does nothing
/// ```
#[derive(Clone, Default)]
pub struct PaymentCallbacks {
    on_start: Option<StartFn>,
    on_success: Option<SuccessFn>,
    on_error: Option<ErrorFn>,
}

impl PaymentCallbacks {
    pub fn with_on_start<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_start = Some(Arc::new(f));
        self
    }

    pub fn with_on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(&ProofToken) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(f));
        self
    }

    pub fn with_on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&PaymentError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }
}

impl PaymentObserver for PaymentCallbacks {
    fn on_payment_start(&self) {
        if let Some(f) = &self.on_start {
            f()
        }
    }

    fn on_payment_success(&self, proof: &ProofToken) {
        if let Some(f) = &self.on_success {
            f(proof)
        }
    }

    fn on_payment_error(&self, error: &PaymentError) {
        if let Some(f) = &self.on_error {
            f(error)
        }
    }
}

impl fmt::Debug for PaymentCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_callbacks_fire_in_registration_slots() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let callbacks = PaymentCallbacks::default()
            .with_on_start(move || l1.lock().unwrap().push("start".into()))
            .with_on_success(move |p: &ProofToken| {
                l2.lock().unwrap().push(format!("success:{p}"))
            })
            .with_on_error(move |e: &PaymentError| {
                l3.lock().unwrap().push(format!("error:{e}"))
            });

        callbacks.on_payment_start();
        callbacks.on_payment_success(&ProofToken::from_signature_bytes([1u8, 2, 3]));
        callbacks.on_payment_error(&PaymentError::WalletUnavailable);

        let log = log.lock().unwrap();
        assert_eq!(log[0], "start");
        assert_eq!(log[1], "success:Ldp");
        assert_eq!(log[2], "error:No wallet available to pay the challenge");
    }

    #[test]
    fn test_empty_callbacks_are_noops() {
        let callbacks = PaymentCallbacks::default();
        callbacks.on_payment_start();
        callbacks.on_payment_error(&PaymentError::WalletUnavailable);
        assert_eq!(
            format!("{callbacks:?}"),
            "PaymentCallbacks { on_start: false, on_success: false, on_error: false }"
        );
    }
}
