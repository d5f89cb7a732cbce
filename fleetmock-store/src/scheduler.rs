//! Delayed message delivery.
//!
//! A [`Scheduler`] holds the sending side of a channel and delivers messages
//! into it after a delay. Inside a tokio runtime the wait is a timer on that
//! runtime, so tests driving a paused clock control exactly when deliveries
//! happen. Outside a runtime it falls back to a plain thread with a blocking
//! sleep, which keeps the store usable from synchronous setup code.

use std::time::Duration;

use tokio::sync::mpsc;

pub struct Scheduler<T> {
    tx: mpsc::Sender<T>,
}

impl<T: Send + 'static> Scheduler<T> {
    pub fn new(tx: mpsc::Sender<T>) -> Self {
        Scheduler { tx }
    }

    /// Deliver `message` into the channel once `delay` has elapsed.
    ///
    /// Delivery is best-effort: if the receiver is gone by then, the message
    /// is dropped with a warning.
    pub fn schedule(&self, message: T, delay: Duration) {
        let tx = self.tx.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if tx.send(message).await.is_err() {
                        tracing::warn!("deferred message dropped: receiver is gone");
                    }
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    if tx.blocking_send(message).is_err() {
                        tracing::warn!("deferred message dropped: receiver is gone");
                    }
                });
            }
        }
    }
}
