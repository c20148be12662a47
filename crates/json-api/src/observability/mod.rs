//! Logging setup and request tracing middleware.

use thiserror::Error;

mod logging;
mod request;

pub(crate) use logging::init;
pub(crate) use request::RequestLogger;

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    #[error("failed to install tracing subscriber")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
