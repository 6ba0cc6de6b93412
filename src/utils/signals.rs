//! Signal handling for graceful shutdown
//!
//! Signals arrive as a stream polled by an ordinary async task, so no file
//! I/O ever runs inside a real signal handler.

use std::io;
use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for SIGTERM or SIGINT and return the signal number.
pub async fn shutdown_signal() -> io::Result<i32> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])?;

    match signals.next().await {
        Some(signal) => {
            info!("Received signal: {}", signal);
            Ok(signal)
        }
        None => Err(io::Error::new(io::ErrorKind::Other, "signal stream closed")),
    }
}
