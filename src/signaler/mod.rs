//! Signal delivery for DavinciPics
//!
//! Provides:
//! - The [`Signaler`] trait with a typed result per signal
//! - Fire-and-forget delivery that only logs failures
//! - Caller-supplied deadlines around a single signal

pub mod davinci;

pub use davinci::{SignalDispatcher, API_KEY_HEADER};

use crate::error::{SignalError, SignalResult};
use crate::models::{RoutingKey, SignalKind, SignalRequest, TokenReference};
use std::sync::Arc;
use std::time::Duration;

/// A signal the endpoint accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalOutcome {
    pub kind: SignalKind,
    pub routing_key: RoutingKey,
    /// HTTP status returned (200 or 201)
    pub status: u16,
}

/// Signal delivery service trait
#[async_trait::async_trait]
pub trait Signaler: Send + Sync {
    /// Validate and deliver one signal, reporting the outcome to the caller
    async fn dispatch(&self, request: &SignalRequest) -> SignalResult<SignalOutcome>;

    /// [`Signaler::dispatch`] bounded by a deadline
    ///
    /// Past the deadline the in-flight call is abandoned and
    /// `DeadlineElapsed` is returned.
    async fn dispatch_with_deadline(
        &self,
        request: &SignalRequest,
        deadline: Duration,
    ) -> SignalResult<SignalOutcome> {
        match tokio::time::timeout(deadline, self.dispatch(request)).await {
            Ok(result) => result,
            Err(_) => Err(SignalError::DeadlineElapsed(deadline)),
        }
    }

    /// Deliver a signal without surfacing failures
    ///
    /// Every error is logged and dropped so signalling never fails the
    /// caller's own workflow.
    async fn signal_best_effort(&self, request: &SignalRequest) {
        match self.dispatch(request).await {
            Ok(_) => {}
            Err(SignalError::Validation(msg)) => {
                tracing::warn!(
                    kind = %request.kind(),
                    network = %request.network(),
                    address = %request.address(),
                    error = %msg,
                    "Signal rejected before sending"
                );
            }
            Err(e) => {
                tracing::error!(
                    kind = %request.kind(),
                    network = %request.network(),
                    address = %request.address(),
                    reason = e.reason(),
                    error = %e,
                    "Failed to send signal"
                );
            }
        }
    }

    /// Signal a token originating on another network
    async fn signal_foreign_token(
        &self,
        network: &str,
        address: &str,
        title: &str,
    ) -> SignalResult<SignalOutcome> {
        self.dispatch(&SignalRequest::foreign_token(network, address, title))
            .await
    }

    /// Signal a wrapped token
    async fn signal_wrapped_token(
        &self,
        network: &str,
        address: &str,
        title: &str,
        original_token: TokenReference,
    ) -> SignalResult<SignalOutcome> {
        self.dispatch(&SignalRequest::wrapped_token(
            network,
            address,
            title,
            original_token,
        ))
        .await
    }

    /// Signal a liquidity-pool token
    async fn signal_liquidity_token(
        &self,
        network: &str,
        address: &str,
        title: &str,
        token0: TokenReference,
        token1: TokenReference,
    ) -> SignalResult<SignalOutcome> {
        self.dispatch(&SignalRequest::liquidity_token(
            network, address, title, token0, token1,
        ))
        .await
    }
}

/// Run [`Signaler::signal_best_effort`] on the runtime without waiting for it
pub fn spawn_best_effort(
    signaler: Arc<dyn Signaler>,
    request: SignalRequest,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        signaler.signal_best_effort(&request).await;
    })
}
