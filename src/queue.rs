//! Durable-queue seam and the in-process implementation.
//!
//! Tasks travel as opaque JSON string payloads. Delivery mimics the
//! semantics of a managed queue: at-least-once in spirit, roughly ordered,
//! with an optional per-message delivery delay. Consumers must tolerate
//! reordering and duplicate delivery.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::{AppError, Result};

/// Publish side of the task queue.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Publish one payload, delivered after `delay` (zero for immediate).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Queue` if the payload cannot be accepted.
    async fn publish(&self, payload: String, delay: Duration) -> Result<()>;
}

/// In-process queue over a bounded channel.
///
/// Delayed publishes are accepted immediately and delivered by a sleeping
/// background task, matching managed-queue delay semantics: the publisher
/// never waits out the delay itself.
#[derive(Clone)]
pub struct InProcessQueue {
    tx: mpsc::Sender<String>,
}

impl InProcessQueue {
    /// Create a queue and its consumer half.
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl TaskQueue for InProcessQueue {
    async fn publish(&self, payload: String, delay: Duration) -> Result<()> {
        if delay.is_zero() {
            return self
                .tx
                .send(payload)
                .await
                .map_err(|err| AppError::Queue(format!("queue closed: {err}")));
        }

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = tx.send(payload).await {
                // The consumer is gone; the delayed message is lost, which
                // matches shutdown semantics for in-flight delayed work.
                warn!(%err, "delayed publish after queue close");
            }
        });
        Ok(())
    }
}
