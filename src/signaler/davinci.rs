//! DavinciPics signal dispatcher
//!
//! Sends one keyed `PUT {base_url}/{network}/{address}` per signal.
//! No retries; the endpoint treats repeated PUTs for a key as last-write-wins.

use super::{SignalOutcome, Signaler};
use crate::config::{AppConfig, SignalConfig};
use crate::error::{SignalError, SignalResult};
use crate::models::{RoutingKey, SignalRequest};
use config::ConfigError;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Header carrying the application API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP signal dispatcher
#[derive(Clone)]
pub struct SignalDispatcher {
    /// Endpoint base, path segments are appended per signal
    base_url: Url,
    /// API key header value, marked sensitive
    api_key: HeaderValue,
    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for SignalDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalDispatcher")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SignalDispatcher {
    /// Create a new dispatcher from validated configuration
    pub fn new(config: SignalConfig) -> SignalResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::Message(format!("Failed to create HTTP client: {}", e)))?;

        Self::with_client(config, client)
    }

    /// Create a dispatcher sharing an existing HTTP client
    pub fn with_client(config: SignalConfig, client: reqwest::Client) -> SignalResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::Message(format!("Signal base URL is invalid: {}", e)))?;

        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ConfigError::Message("API key is not a valid header value".to_string()))?;
        api_key.set_sensitive(true);

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Create from `.env`, config files and environment variables
    pub fn from_env() -> Option<Self> {
        let config = match AppConfig::load_with_env() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Signal configuration unavailable");
                return None;
            }
        };

        match Self::new(config.signal) {
            Ok(dispatcher) => Some(dispatcher),
            Err(e) => {
                tracing::warn!(error = %e, "Signal configuration rejected");
                None
            }
        }
    }

    /// `{base_url}/{network}/{address}`, each segment percent-encoded
    pub fn endpoint(&self, key: &RoutingKey) -> Url {
        let mut url = self.base_url.clone();
        // Validation rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&key.network)
                .push(&key.address);
        }
        url
    }

    /// Validate a signal and build the outbound request without sending it
    pub fn build_request(&self, request: &SignalRequest) -> SignalResult<reqwest::Request> {
        request.validate()?;

        let http_request = self
            .client
            .put(self.endpoint(&request.routing_key()))
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.api_key.clone())
            .json(&request.body())
            .build()?;

        Ok(http_request)
    }
}

#[async_trait::async_trait]
impl Signaler for SignalDispatcher {
    async fn dispatch(&self, request: &SignalRequest) -> SignalResult<SignalOutcome> {
        let kind = request.kind();
        let routing_key = request.routing_key();
        let http_request = self.build_request(request)?;

        tracing::debug!(
            kind = %kind,
            network = %routing_key.network,
            address = %routing_key.address,
            "Sending signal"
        );

        let response = self.client.execute(http_request).await?;
        let status = response.status();

        if status == StatusCode::OK || status == StatusCode::CREATED {
            tracing::info!(
                kind = %kind,
                network = %routing_key.network,
                address = %routing_key.address,
                status = status.as_u16(),
                "{} was successfully sent to DavinciPics",
                kind
            );
            return Ok(SignalOutcome {
                kind,
                routing_key,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(SignalError::RemoteRejection {
            status: status.as_u16(),
            body,
        })
    }
}
