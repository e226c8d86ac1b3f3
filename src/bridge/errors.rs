use std::time::Duration;

use thiserror::Error;

use crate::afford::AffordanceError;

/// Conditions that end a session or keep one from starting.
///
/// Empty commands and unknown assets never show up here; the wait loop
/// handles those itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no request within {0:?}, session closed")]
    InactivityTimeout(Duration),

    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("bridge is not active")]
    Inactive,

    #[error("network transport closed")]
    TransportClosed,

    #[error(transparent)]
    Affordances(#[from] AffordanceError),

    #[error("failed to encode footer: {0}")]
    Footer(#[from] serde_json::Error),
}
