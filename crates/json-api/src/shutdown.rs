//! Graceful shutdown

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownError {
    #[error("failed to install interrupt handler")]
    Interrupt(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler")]
    Terminate(#[source] io::Error),
}

#[cfg(unix)]
async fn terminated() -> Result<(), ShutdownError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownError::Terminate)?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminated() -> Result<(), ShutdownError> {
    std::future::pending().await
}

/// Stop the server gracefully on Ctrl+C or SIGTERM.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownError> {
    tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(ShutdownError::Interrupt)?;
            info!(signal = "interrupt", "shutting down");
        }
        result = terminated() => {
            result?;
            info!(signal = "terminate", "shutting down");
        }
    }

    handle.stop_graceful(None);

    Ok(())
}
