use tokio::sync::mpsc;

use super::Event;

/// Receives events published by [`EventParser`](super::EventParser).
///
/// Handlers run while the parser's dispatch lock is held, so they should not block or publish
/// to the same parser. Registering further handlers from inside `handle_event` is fine; they
/// start receiving with the next event.
pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &Event);
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) + Send,
{
    fn handle_event(&mut self, event: &Event) {
        self(event)
    }
}

/// Forwards events into an async channel for a single consumer task.
pub struct ChannelForwarder {
    tx: mpsc::UnboundedSender<Event>,
}

impl ChannelForwarder {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }
}

impl EventHandler for ChannelForwarder {
    fn handle_event(&mut self, event: &Event) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(code = event.raw_code(), "Event channel closed, dropping event");
        }
    }
}
