//! Outgoing request lifecycle (spec.md §4.3 "Outgoing request lifecycle").
//!
//! Builds the Call, registers it for correlation, and — when the station
//! isn't Accepted yet and the action isn't BootNotification — buffers it
//! into an in-memory queue instead of writing immediately. The queue also
//! implements the backpressure rule from §5: ATG cycles pause once the
//! queue reaches a high-water mark, resuming once it drains below the low
//! mark.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::domain::station::RegistrationState;
use crate::support::ids::new_message_id;
use crate::support::ocpp_frame::OcppFrame;

use super::pending::{PendingAwait, PendingRequests};

/// Retry policy for transaction-critical Calls (spec.md §4.3 step 5):
/// TransactionEvent/StatusNotification.req(Updated)/StopTransaction/MeterValues.
pub fn requires_retry(action: &str) -> bool {
    matches!(
        action,
        "StopTransaction" | "MeterValues" | "TransactionEvent" | "StartTransaction"
    )
}

/// An outgoing Call queued for write because the station isn't Accepted yet.
pub struct QueuedCall {
    pub frame: OcppFrame,
}

/// FIFO outbound queue with high/low backpressure watermarks.
pub struct OutboundQueue {
    queue: Mutex<VecDeque<QueuedCall>>,
    high_water_mark: usize,
    low_water_mark: usize,
    paused: AtomicBool,
}

impl OutboundQueue {
    pub fn new(high_water_mark: usize, low_water_mark: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            high_water_mark,
            low_water_mark,
            paused: AtomicBool::new(false),
        }
    }

    pub fn push(&self, call: QueuedCall) {
        let mut queue = self.queue.lock().expect("outbound queue mutex poisoned");
        queue.push_back(call);
        if queue.len() >= self.high_water_mark {
            self.paused.store(true, Ordering::SeqCst);
        }
    }

    pub fn pop(&self) -> Option<QueuedCall> {
        let mut queue = self.queue.lock().expect("outbound queue mutex poisoned");
        let item = queue.pop_front();
        if queue.len() <= self.low_water_mark {
            self.paused.store(false, Ordering::SeqCst);
        }
        item
    }

    /// Whether ATG cycles should currently be paused (spec.md §5 "Backpressure").
    pub fn is_backpressured(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().expect("outbound queue mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `action` should be buffered rather than written immediately,
/// given the station's current registration state (spec.md §4.3 step 3).
pub fn should_buffer(state: RegistrationState, action: &str) -> bool {
    !matches!(state, RegistrationState::Accepted) && action != "BootNotification"
}

/// Builds a fresh Call frame for `action`/`payload`, registering it in
/// `pending` with the given timeout so the caller can await its response.
pub fn build_call<T: Serialize>(
    pending: &PendingRequests,
    action: &str,
    payload: &T,
    timeout: Duration,
) -> (OcppFrame, PendingAwait) {
    let message_id = new_message_id();
    let payload_value: Value = serde_json::to_value(payload).expect("OCPP payload must serialize");
    let frame = OcppFrame::Call {
        message_id: message_id.clone(),
        action: action.to_string(),
        payload: payload_value,
    };
    let awaiting = pending.register(message_id, action, timeout);
    (frame, awaiting)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backpressure_engages_at_high_water_mark_and_releases_at_low() {
        let queue = OutboundQueue::new(2, 0);
        assert!(!queue.is_backpressured());
        queue.push(QueuedCall {
            frame: OcppFrame::Call {
                message_id: "1".into(),
                action: "Heartbeat".into(),
                payload: serde_json::json!({}),
            },
        });
        assert!(!queue.is_backpressured());
        queue.push(QueuedCall {
            frame: OcppFrame::Call {
                message_id: "2".into(),
                action: "Heartbeat".into(),
                payload: serde_json::json!({}),
            },
        });
        assert!(queue.is_backpressured());
        queue.pop();
        queue.pop();
        assert!(!queue.is_backpressured());
    }

    #[test]
    fn buffers_non_boot_calls_before_accepted() {
        assert!(should_buffer(RegistrationState::Booting, "Heartbeat"));
        assert!(!should_buffer(RegistrationState::Booting, "BootNotification"));
        assert!(!should_buffer(RegistrationState::Accepted, "Heartbeat"));
    }
}
