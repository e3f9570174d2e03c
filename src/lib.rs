//! DavinciPics Signal Library
//!
//! Notifies the DavinciPics indexing service about tokens an app
//! originates: foreign tokens, wrapped tokens and liquidity-pool tokens.
//! Each signal is validated, then sent as one keyed HTTP `PUT`.

pub mod config;
pub mod error;
pub mod models;
pub mod signaler;
pub mod telemetry;

pub use crate::config::{AppConfig, SignalConfig};
pub use error::{SignalError, SignalResult};
pub use models::{RoutingKey, SignalBody, SignalKind, SignalRequest, TokenReference};
pub use signaler::{spawn_best_effort, SignalDispatcher, SignalOutcome, Signaler};
