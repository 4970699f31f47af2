//! Background tasks for the engagement timeout and the history reset.
//!
//! Both go through the timeline's write lock, the same as event publishing, so a timer
//! callback never overlaps a semantic event.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{SharedSettings, SharedTimeline};

/// Handles to the two timer tasks of one timeline. Dropping stops them.
pub struct TimelineTimers {
    engagement: JoinHandle<()>,
    history: JoinHandle<()>,
}

impl TimelineTimers {
    /// Start both timers. Must be called from within a tokio runtime.
    pub fn spawn(timeline: SharedTimeline, settings: SharedSettings) -> Self {
        let engagement = tokio::spawn(run_engagement_timer(Arc::clone(&timeline)));
        let history = tokio::spawn(run_history_timer(timeline, settings));
        Self {
            engagement,
            history,
        }
    }

    /// Abort both tasks. Never blocks, so it is safe from inside a timeline callback.
    pub fn stop(&self) {
        self.engagement.abort();
        self.history.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.engagement.is_finished() && self.history.is_finished()
    }
}

impl Drop for TimelineTimers {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_engagement_timer(timeline: SharedTimeline) {
    let rearm = timeline.read().await.rearm_signal();
    loop {
        let deadline = timeline.read().await.engagement_deadline();
        let Some(deadline) = deadline else {
            rearm.notified().await;
            continue;
        };
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                timeline.write().await.expire_engagement_at(Instant::now());
            }
            _ = rearm.notified() => {}
        }
    }
}

async fn run_history_timer(timeline: SharedTimeline, settings: SharedSettings) {
    let mut interval = timeline.read().await.history_interval();
    loop {
        tokio::time::sleep(interval).await;
        let current = settings.read().await.clone();
        interval = timeline.write().await.on_history_timer(&current);
        tracing::debug!(interval_ms = interval.as_millis() as u64, "History timer rearmed");
    }
}
