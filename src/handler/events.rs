//! Hot broadcast channels for retry progress events.

use tokio::sync::broadcast;

/// Buffered events per channel before lagging subscribers start losing the
/// oldest ones. Delivery is best-effort; the retry loop never waits for
/// subscribers.
const CHANNEL_CAPACITY: usize = 32;

/// The pair of progress channels owned by a handler.
///
/// `publish_*` is fire-and-forget: send errors (no subscribers) are
/// discarded. `close` drops both senders so every subscriber observes
/// channel closure; it is idempotent, and subscriptions taken after it
/// observe a channel that is already closed.
pub(crate) struct EventChannels {
    retrying: Option<broadcast::Sender<u32>>,
    retried: Option<broadcast::Sender<bool>>,
}

impl EventChannels {
    pub(crate) fn new() -> Self {
        let (retrying, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (retried, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            retrying: Some(retrying),
            retried: Some(retried),
        }
    }

    pub(crate) fn subscribe_retrying(&self) -> broadcast::Receiver<u32> {
        match &self.retrying {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    pub(crate) fn subscribe_retried(&self) -> broadcast::Receiver<bool> {
        match &self.retried {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    pub(crate) fn publish_retrying(&self, attempt: u32) {
        if let Some(tx) = &self.retrying {
            let _ = tx.send(attempt);
        }
    }

    pub(crate) fn publish_retried(&self, recovered: bool) {
        if let Some(tx) = &self.retried {
            let _ = tx.send(recovered);
        }
    }

    pub(crate) fn close(&mut self) {
        self.retrying = None;
        self.retried = None;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.retrying.is_none()
    }
}

fn closed_receiver<T: Clone>() -> broadcast::Receiver<T> {
    let (tx, rx) = broadcast::channel(1);
    drop(tx);
    rx
}

#[cfg(test)]
mod events_tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let events = EventChannels::new();
        events.publish_retrying(1);
        events.publish_retried(true);
    }

    #[tokio::test]
    async fn test_subscribers_see_published_events() {
        let events = EventChannels::new();
        let mut retrying = events.subscribe_retrying();
        let mut retried = events.subscribe_retried();

        events.publish_retrying(1);
        events.publish_retrying(2);
        events.publish_retried(false);

        assert_eq!(retrying.recv().await.unwrap(), 1);
        assert_eq!(retrying.recv().await.unwrap(), 2);
        assert!(!retried.recv().await.unwrap());
    }

    #[tokio::test]
    async fn test_close_detaches_subscribers() {
        let mut events = EventChannels::new();
        let mut retrying = events.subscribe_retrying();

        events.close();
        assert!(events.is_closed());
        assert_eq!(retrying.recv().await, Err(RecvError::Closed));

        // Idempotent, and later subscriptions observe a closed channel.
        events.close();
        let mut late = events.subscribe_retried();
        assert_eq!(late.try_recv(), Err(TryRecvError::Closed));
    }

    #[test]
    fn test_publish_after_close_is_silent() {
        let mut events = EventChannels::new();
        events.close();
        events.publish_retrying(1);
        events.publish_retried(true);
    }
}
