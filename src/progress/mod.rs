//! Progress reporting for running crawl jobs
//!
//! The engine emits fire-and-forget progress events through the
//! [`ProgressSink`] capability. Sinks must never block the crawl: a slow or
//! disconnected consumer is an observability problem, not a control
//! dependency, and the job runs to completion regardless.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

/// A single progress update from a running job
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub job_id: i64,
    pub message: String,
    pub processed: usize,
    pub total: usize,
}

/// Consumer of progress events
///
/// Implementations forward events to a caller (an HTTP poll response, a
/// streaming RPC, a log). Delivery is at-most-once; a failed delivery is
/// logged and never retried.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Sink that forwards events to the tracing subscriber
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: ProgressEvent) {
        tracing::info!(
            job_id = event.job_id,
            processed = event.processed,
            total = event.total,
            "{}",
            event.message
        );
    }
}

/// Sink that forwards events into an unbounded channel
///
/// A dropped receiver is detected on the next emission, logged once, and
/// events are silently discarded from then on.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
    disconnected: AtomicBool,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                disconnected: AtomicBool::new(false),
            },
            rx,
        )
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        let job_id = event.job_id;
        if self.tx.send(event).is_err() && !self.disconnected.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "Progress receiver for job {} disconnected, continuing without updates",
                job_id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(message: &str) -> ProgressEvent {
        ProgressEvent {
            job_id: 1,
            message: message.to_string(),
            processed: 0,
            total: 10,
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(event("Job started"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, "Job started");
        assert_eq!(received.total, 10);
    }

    #[tokio::test]
    async fn test_channel_sink_survives_disconnect() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        // Must not panic or block once the receiver is gone
        sink.emit(event("one"));
        sink.emit(event("two"));
        assert!(sink.disconnected.load(Ordering::Relaxed));
    }
}
