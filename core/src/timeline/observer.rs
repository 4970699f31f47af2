use serde::Serialize;
use tokio::sync::mpsc;
use xivparse_types::TimelineEventType;

/// Emitted once per published timeline event, after the timeline has applied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineChangedEvent {
    pub event_type: TimelineEventType,
    pub args: Vec<String>,
}

impl TimelineChangedEvent {
    /// Entity name carried by the event, if any.
    pub fn subject(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

pub trait TimelineObserver: Send + Sync {
    fn timeline_changed(&mut self, event: &TimelineChangedEvent);

    /// Called from the engagement timer once `fighting_right_now` has dropped.
    fn engagement_timed_out(&mut self, _active_seconds: f64) {}
}

impl<F> TimelineObserver for F
where
    F: FnMut(&TimelineChangedEvent) + Send + Sync,
{
    fn timeline_changed(&mut self, event: &TimelineChangedEvent) {
        self(event)
    }
}

/// Forwards timeline notifications to an async consumer.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<TimelineChangedEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<TimelineChangedEvent>) -> Self {
        Self { tx }
    }
}

impl TimelineObserver for ChannelObserver {
    fn timeline_changed(&mut self, event: &TimelineChangedEvent) {
        if self.tx.send(event.clone()).is_err() {
            tracing::debug!(event = %event.event_type, "Timeline channel closed");
        }
    }
}
