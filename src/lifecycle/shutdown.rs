//! Stop signal for the HTTP server.

use tokio::sync::broadcast;

/// Handle that tells the HTTP server to stop accepting connections and
/// drain in-flight rankings.
///
/// `main` takes the server's receiver before the signal handler starts, so a
/// Ctrl+C that arrives during startup is not lost. Clones share one channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver to hand to [`HttpServer::run`](crate::http::HttpServer::run).
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask the server to stop. Returns `false` when nothing was listening,
    /// e.g. the server already exited.
    pub fn trigger(&self) -> bool {
        let delivered = self.tx.send(()).is_ok();
        if !delivered {
            tracing::debug!("Shutdown requested with no running server");
        }
        delivered
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
