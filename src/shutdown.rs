//! Ctrl-C handling for the binary.

use std::future::Future;
use std::io;

use log::{info, warn};

/// Resolves once `signal` reports an interrupt.
///
/// If the handler could not be installed the error is logged and the
/// returned future never resolves, so the bridge keeps running until the
/// sensor stream ends.
pub async fn interrupted<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("interrupted, exiting"),
        Err(e) => {
            warn!("cannot listen for Ctrl-C, running until the sensor stream ends: {e}");
            std::future::pending::<()>().await
        }
    }
}
