//! Process termination signals mapped onto the server's cancellation token.

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Spawns a watcher that cancels `token` on Ctrl+C or SIGTERM.
///
/// The watcher also ends when `token` is cancelled elsewhere, e.g. after the
/// server stopped on its own.
pub fn cancel_on_shutdown(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = token.cancelled() => {}
            received = termination() => {
                match received {
                    Ok(name) => info!(signal = name, "shutdown signal received"),
                    Err(e) => error!(error = %e, "signal handling failed, shutting down"),
                }
                token.cancel();
            }
        }
    })
}

#[cfg(unix)]
async fn termination() -> std::io::Result<&'static str> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    tokio::select! {
        result = signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn termination() -> std::io::Result<&'static str> {
    signal::ctrl_c().await.map(|()| "ctrl-c")
}
