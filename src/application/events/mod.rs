//! In-process event bus (spec.md §6 "Events emitted upward"), a thin
//! `tokio::sync::broadcast` fan-out.

use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::events::Event;

const CHANNEL_CAPACITY: usize = 1024;

/// Broadcasts [`Event`]s to every subscriber (CLI status line, performance
/// recorder, future admin front-ends). Slow subscribers drop old events
/// rather than back-pressuring station runtimes.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) {
        debug!(event_type = event.event_type(), station_id = event.station_id(), "publishing event");
        metrics::counter!("ocpp_station_sim_events_total", "type" => event.event_type()).increment(1);
        // No subscribers is a normal state (e.g. a headless run with no CLI
        // status line attached); send() returning Err just means that.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::StationLifecycleEvent;
    use chrono::Utc;

    #[tokio::test]
    async fn published_events_reach_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(Event::Started(StationLifecycleEvent {
            station_id: "CP1".into(),
            timestamp: Utc::now(),
            reason: None,
        }));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.station_id(), "CP1");
        assert_eq!(received.event_type(), "started");
    }
}
