//! Change notification for polling hosts.
//!
//! [`RemoteSearch`](crate::search::RemoteSearch) mutates its state from
//! spawned tasks, so a host that renders that state needs a signal that
//! something changed. The channel here carries unit signals only: on wakeup
//! the host re-reads whatever it cares about through the accessors.

use tokio::sync::mpsc;

/// Signals that controller state changed and should be re-read.
///
/// Cheap to clone. [`notify`](ChangeNotifier::notify) never blocks: signals
/// are coalesced when the listener lags, and dropped entirely once the
/// listener is gone.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: mpsc::Sender<()>,
}

impl ChangeNotifier {
    /// Queues a wakeup for the listener.
    pub fn notify(&self) {
        // A full buffer already guarantees a pending wakeup.
        let _ = self.tx.try_send(());
    }
}

/// Receiving half held by the host.
#[derive(Debug)]
pub struct ChangeListener {
    rx: mpsc::Receiver<()>,
}

impl ChangeListener {
    /// Waits for the next change signal.
    ///
    /// Returns `false` when every [`ChangeNotifier`] has been dropped and
    /// no buffered signals remain.
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Discards any buffered signals without waiting.
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Creates a connected notifier/listener pair.
pub fn change_channel() -> (ChangeNotifier, ChangeListener) {
    let (tx, rx) = mpsc::channel(16);
    (ChangeNotifier { tx }, ChangeListener { rx })
}
