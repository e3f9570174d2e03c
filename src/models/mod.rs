//! Signal models - token references and the requests built from them

pub mod signal;

pub use signal::{RoutingKey, SignalBody, SignalKind, SignalRequest, TokenReference};
