//! Signal models - represents outbound token signals
//!
//! A signal request is one of three kinds:
//! - `TOKEN`: a foreign token registered as-is
//! - `WRAPPED`: a token wrapping an original token
//! - `LP`: a liquidity-pool token over two underlying tokens
//!
//! Requests deserialize from the same JSON shape callers already produce,
//! e.g. `{"type":"TOKEN","network":"Binance","address":"0x0E09...","title":"cake"}`.

use crate::error::{SignalError, SignalResult};
use serde::{Deserialize, Serialize};

/// Network on which apps may only signal wrapped or LP tokens
pub const RESTRICTED_NETWORK: &str = "hedera";

/// Signal kind, rendered as the wire discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    /// Plain foreign token
    Token,
    /// Wrapped token
    Wrapped,
    /// Liquidity-pool token
    Lp,
}

impl SignalKind {
    /// Wire discriminant for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Token => "TOKEN",
            SignalKind::Wrapped => "WRAPPED",
            SignalKind::Lp => "LP",
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SignalKind {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TOKEN" => Ok(SignalKind::Token),
            "WRAPPED" => Ok(SignalKind::Wrapped),
            "LP" => Ok(SignalKind::Lp),
            other => Err(SignalError::Validation(format!(
                "Unknown signal type: {}",
                other
            ))),
        }
    }
}

/// A token on a given network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenReference {
    pub network: String,
    pub address: String,
}

impl TokenReference {
    pub fn new(network: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
        }
    }
}

/// The `(network, address)` pair a signal is keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingKey {
    pub network: String,
    pub address: String,
}

impl std::fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.address)
    }
}

/// Token signal request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SignalRequest {
    /// A token originating on another network
    #[serde(rename = "TOKEN")]
    ForeignToken {
        network: String,
        address: String,
        title: String,
    },
    /// A token wrapping `original_token`, on the same or another network
    #[serde(rename = "WRAPPED")]
    WrappedToken {
        network: String,
        address: String,
        title: String,
        #[serde(rename = "originalToken")]
        original_token: TokenReference,
    },
    /// A liquidity-pool token over `token0` and `token1`
    #[serde(rename = "LP")]
    LiquidityToken {
        network: String,
        address: String,
        title: String,
        token0: TokenReference,
        token1: TokenReference,
    },
}

impl SignalRequest {
    /// Build a foreign token signal
    pub fn foreign_token(
        network: impl Into<String>,
        address: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        SignalRequest::ForeignToken {
            network: network.into(),
            address: address.into(),
            title: title.into(),
        }
    }

    /// Build a wrapped token signal
    pub fn wrapped_token(
        network: impl Into<String>,
        address: impl Into<String>,
        title: impl Into<String>,
        original_token: TokenReference,
    ) -> Self {
        SignalRequest::WrappedToken {
            network: network.into(),
            address: address.into(),
            title: title.into(),
            original_token,
        }
    }

    /// Build a liquidity-pool token signal
    pub fn liquidity_token(
        network: impl Into<String>,
        address: impl Into<String>,
        title: impl Into<String>,
        token0: TokenReference,
        token1: TokenReference,
    ) -> Self {
        SignalRequest::LiquidityToken {
            network: network.into(),
            address: address.into(),
            title: title.into(),
            token0,
            token1,
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            SignalRequest::ForeignToken { .. } => SignalKind::Token,
            SignalRequest::WrappedToken { .. } => SignalKind::Wrapped,
            SignalRequest::LiquidityToken { .. } => SignalKind::Lp,
        }
    }

    pub fn network(&self) -> &str {
        match self {
            SignalRequest::ForeignToken { network, .. }
            | SignalRequest::WrappedToken { network, .. }
            | SignalRequest::LiquidityToken { network, .. } => network,
        }
    }

    pub fn address(&self) -> &str {
        match self {
            SignalRequest::ForeignToken { address, .. }
            | SignalRequest::WrappedToken { address, .. }
            | SignalRequest::LiquidityToken { address, .. } => address,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SignalRequest::ForeignToken { title, .. }
            | SignalRequest::WrappedToken { title, .. }
            | SignalRequest::LiquidityToken { title, .. } => title,
        }
    }

    /// Routing key from the top-level fields, never from nested references
    pub fn routing_key(&self) -> RoutingKey {
        RoutingKey {
            network: self.network().to_string(),
            address: self.address().to_string(),
        }
    }

    /// Check domain rules before any I/O
    ///
    /// The top-level network and address must be usable path segments.
    /// Foreign tokens may not be registered on the restricted network
    /// (compared case-insensitively). Wrapped and LP tokens are otherwise
    /// accepted as given.
    pub fn validate(&self) -> SignalResult<()> {
        validate_segment("network", self.network())?;
        validate_segment("address", self.address())?;

        match self {
            SignalRequest::ForeignToken { network, .. } => {
                if network.eq_ignore_ascii_case(RESTRICTED_NETWORK) {
                    return Err(SignalError::Validation(
                        "Apps may not register native tokens on this network directly, \
                         only wrapped or liquidity-pool tokens"
                            .to_string(),
                    ));
                }
                Ok(())
            }
            SignalRequest::WrappedToken { .. } => Ok(()),
            SignalRequest::LiquidityToken { .. } => Ok(()),
        }
    }

    /// Wire body: every field except the routing key, tagged with `type`
    pub fn body(&self) -> SignalBody<'_> {
        match self {
            SignalRequest::ForeignToken { title, .. } => SignalBody::Token { title },
            SignalRequest::WrappedToken {
                title,
                original_token,
                ..
            } => SignalBody::Wrapped {
                title,
                original_token,
            },
            SignalRequest::LiquidityToken {
                title,
                token0,
                token1,
                ..
            } => SignalBody::Lp {
                title,
                token0,
                token1,
            },
        }
    }
}

/// Routing fields become URL path segments; empty and dot segments
/// would be dropped or collapsed by URL normalization
fn validate_segment(field: &str, value: &str) -> SignalResult<()> {
    if value.is_empty() || value == "." || value == ".." {
        return Err(SignalError::Validation(format!(
            "Signal {} cannot be used as a path segment: {:?}",
            field, value
        )));
    }
    Ok(())
}

/// JSON body sent to the indexing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SignalBody<'a> {
    #[serde(rename = "TOKEN")]
    Token { title: &'a str },
    #[serde(rename = "WRAPPED")]
    Wrapped {
        title: &'a str,
        #[serde(rename = "originalToken")]
        original_token: &'a TokenReference,
    },
    #[serde(rename = "LP")]
    Lp {
        title: &'a str,
        token0: &'a TokenReference,
        token1: &'a TokenReference,
    },
}
