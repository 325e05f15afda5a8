//! Ctrl-C handling.

use fanfetch_dispatch::CancellationToken;
use tracing::warn;

/// Return a token that is cancelled on the first Ctrl-C.
///
/// Cancelling does not abort the run: unfinished fetches are reported as
/// cancelled and the report is still printed.
pub fn spawn_interrupt_handler() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling unfinished fetches");
            trigger.cancel();
        }
    });
    cancel
}
