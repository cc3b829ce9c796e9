use std::time::Duration;

use tracing::warn;

use crate::shutdown::{StopReason, StopSignal};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Aborts the run on Ctrl+C or SIGTERM. Exits quietly once the run stops
/// for any other reason.
pub(crate) fn setup_signal_shutdown_handler(stop: &StopSignal) -> tokio::task::JoinHandle<()> {
    let stop = stop.clone();
    tokio::spawn(async move {
        let mut listener = stop.listener();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                _ = listener.stopped() => {}
                _ = tokio::signal::ctrl_c() => {
                    if stop.trigger(StopReason::Aborted) {
                        warn!("Interrupted; stopping run");
                    }
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    if stop.trigger(StopReason::Aborted) {
                        warn!("Received SIGTERM; stopping run");
                    }
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = listener.stopped() => {}
                _ = tokio::signal::ctrl_c() => {
                    if stop.trigger(StopReason::Aborted) {
                        warn!("Interrupted; stopping run");
                    }
                }
            }
        }
    })
}

/// Aborts the run if it is still going after `timeout`.
pub(crate) fn setup_run_timeout(
    stop: &StopSignal,
    timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    let stop = stop.clone();
    tokio::spawn(async move {
        let mut listener = stop.listener();
        tokio::select! {
            _ = listener.stopped() => {}
            () = tokio::time::sleep(timeout) => {
                if stop.trigger(StopReason::Aborted) {
                    warn!("Run timeout of {:?} reached; stopping run", timeout);
                }
            }
        }
    })
}
