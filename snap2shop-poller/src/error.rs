//! Poller error types

use snap2shop_client::ClientError;
use thiserror::Error;

/// Errors reported by the status poller
#[derive(Debug, Error)]
pub enum PollError {
    /// Transport failure or non-2xx response from the backend
    #[error("network error: {0}")]
    Network(#[from] ClientError),

    /// A status request for this shop is still outstanding
    #[error("a status request for {shop} is already in flight")]
    InFlight { shop: String },
}
