//! Stop requests for the processing loop.
//!
//! The daemon turns SIGINT/SIGTERM into a [`StopReason`]; tests and embedding
//! code call [`StopHandle::request_stop`] directly. The loop only polls its
//! [`StopListener`] between blocks, so a prevote or reveal that is already
//! being submitted for the current block completes first.
//!
//! The request is latched: a listener created after the stop was requested
//! still observes it, so a signal that arrives while the loop is fetching the
//! oracle parameters is not lost.

use std::fmt;
use tokio::sync::watch;

/// What asked the feeder to stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Interrupt,
    Terminate,
    /// Requested by code rather than by a signal.
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Interrupt => "SIGINT",
            StopReason::Terminate => "SIGTERM",
            StopReason::Requested => "stop requested",
        })
    }
}

/// Owner side: requests a stop once; later requests keep the first reason.
pub struct StopHandle {
    tx: watch::Sender<Option<StopReason>>,
}

/// Loop side: resolves once a stop has been requested.
pub struct StopListener {
    rx: watch::Receiver<Option<StopReason>>,
}

impl StopHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn listener(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }

    pub fn request_stop(&self, reason: StopReason) {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }

    pub fn reason(&self) -> Option<StopReason> {
        *self.tx.borrow()
    }

    /// Wait for SIGINT or SIGTERM and turn it into a stop request.
    pub async fn stop_on_signal(&self) {
        let interrupt = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable, only SIGINT stops the feeder: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        let reason = tokio::select! {
            _ = interrupt => StopReason::Interrupt,
            _ = terminate => StopReason::Terminate,
        };
        tracing::info!(%reason, "stopping the feeder after the current block");
        self.request_stop(reason);
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl StopListener {
    /// Resolves with the stop reason. Never resolves if every handle is
    /// dropped without a stop being requested.
    pub async fn stopped(&mut self) -> StopReason {
        match self.rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or(StopReason::Requested),
            Err(_) => std::future::pending().await,
        }
    }
}
