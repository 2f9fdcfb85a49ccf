use tokio::sync::broadcast;
use tracing::trace;

use super::events::AppEvent;

const EVENT_CAPACITY: usize = 64;

/// Fan-out channel for application events.
///
/// Listeners that fall behind lose the oldest events; nothing here
/// depends on every listener seeing every event.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit an application event to all listeners
pub fn emit_event(bus: &EventBus, event: AppEvent) {
    let name = event.name();
    // A send error only means nobody is listening right now.
    match bus.tx.send(event) {
        Ok(listeners) => trace!(event = name, listeners, "event emitted"),
        Err(_) => trace!(event = name, "event dropped, no listeners"),
    }
}
