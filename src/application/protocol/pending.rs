//! Pending-request correlation (spec.md §3 "Pending Request Map", §8 law #1).
//!
//! A `DashMap` keyed by message id holding a `oneshot::Sender`, with
//! `tokio::time::timeout` wrapping the receiver so a Call that never gets a
//! matching CallResult/CallError still
//! resolves, with a `Timeout` error, once its deadline passes.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::warn;

use super::{ProtocolError, ProtocolResult};

type ResponseResult = Result<Value, ProtocolError>;

struct PendingEntry {
    action: String,
    sender: oneshot::Sender<ResponseResult>,
}

/// One station's outstanding Call → response correlation table.
///
/// Entry is removed when the matching CallResult/CallError arrives, or when
/// the caller's timeout fires first (the entry then lingers until the real
/// reply shows up, at which point it's an orphan and gets dropped with a
/// warning — spec.md §8 law #1: "orphans are dropped with a warning").
#[derive(Clone, Default)]
pub struct PendingRequests {
    entries: Arc<DashMap<String, PendingEntry>>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending Call and returns a future resolving to its
    /// response, racing against `timeout`.
    pub fn register(&self, message_id: String, action: impl Into<String>, timeout: Duration) -> PendingAwait {
        let (tx, rx) = oneshot::channel();
        self.entries.insert(
            message_id.clone(),
            PendingEntry {
                action: action.into(),
                sender: tx,
            },
        );
        PendingAwait {
            message_id,
            receiver: rx,
            timeout,
        }
    }

    /// Delivers a CallResult payload to the waiting caller, if any.
    pub fn resolve(&self, message_id: &str, payload: Value) {
        if let Some((_, entry)) = self.entries.remove(message_id) {
            let _ = entry.sender.send(Ok(payload));
        } else {
            warn!(message_id, "dropping orphan CallResult: no matching pending Call");
        }
    }

    /// Delivers a CallError to the waiting caller, if any.
    pub fn reject(&self, message_id: &str, code: String, description: String) {
        if let Some((_, entry)) = self.entries.remove(message_id) {
            let _ = entry.sender.send(Err(ProtocolError::CallError { code, description }));
        } else {
            warn!(message_id, code, "dropping orphan CallError: no matching pending Call");
        }
    }

    /// Fails every outstanding entry with `Disconnected` — called on socket close.
    pub fn fail_all_disconnected(&self) {
        let ids: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        for id in ids {
            if let Some((_, entry)) = self.entries.remove(&id) {
                let _ = entry.sender.send(Err(ProtocolError::Disconnected));
            }
        }
    }

    pub fn action_for(&self, message_id: &str) -> Option<String> {
        self.entries.get(message_id).map(|e| e.action.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Awaits a single Call's response, bounded by its message-timeout deadline.
pub struct PendingAwait {
    message_id: String,
    receiver: oneshot::Receiver<ResponseResult>,
    timeout: Duration,
}

impl PendingAwait {
    pub async fn wait(self) -> ProtocolResult<Value> {
        match tokio::time::timeout(self.timeout, self.receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(ProtocolError::Disconnected),
            Err(_) => {
                warn!(message_id = %self.message_id, "Call timed out waiting for a response");
                Err(ProtocolError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_matching_call_result() {
        let pending = PendingRequests::new();
        let awaiting = pending.register("m1".into(), "Heartbeat", Duration::from_secs(5));
        pending.resolve("m1", serde_json::json!({"currentTime": "2024-01-01T00:00:00Z"}));
        let result = awaiting.wait().await.unwrap();
        assert_eq!(result["currentTime"], "2024-01-01T00:00:00Z");
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn rejects_with_call_error() {
        let pending = PendingRequests::new();
        let awaiting = pending.register("m2".into(), "Heartbeat", Duration::from_secs(5));
        pending.reject("m2", "NotImplemented".into(), "nope".into());
        let err = awaiting.wait().await.unwrap_err();
        assert!(matches!(err, ProtocolError::CallError { .. }));
    }

    #[tokio::test]
    async fn times_out_without_a_response() {
        let pending = PendingRequests::new();
        let awaiting = pending.register("m3".into(), "Heartbeat", Duration::from_millis(20));
        let err = awaiting.wait().await.unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout));
    }

    #[tokio::test]
    async fn orphan_result_is_dropped() {
        let pending = PendingRequests::new();
        // No register() call: resolving an unknown id must not panic.
        pending.resolve("ghost", serde_json::json!({}));
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn fail_all_disconnected_resolves_every_waiter() {
        let pending = PendingRequests::new();
        let a = pending.register("m4".into(), "Heartbeat", Duration::from_secs(5));
        let b = pending.register("m5".into(), "Heartbeat", Duration::from_secs(5));
        pending.fail_all_disconnected();
        assert!(matches!(a.wait().await, Err(ProtocolError::Disconnected)));
        assert!(matches!(b.wait().await, Err(ProtocolError::Disconnected)));
    }
}
