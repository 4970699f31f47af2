//! One parse session: a classifier and a timeline wired together.

pub mod replay;
mod settings;

pub use replay::{ReplayLineError, ReplayStats, parse_replay_line, replay_bytes, replay_file};
pub use settings::{APP_NAME, ParseSettingsExt};

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use xivparse_types::{ParseSettings, TimelineEventType};

use crate::events::{ChannelForwarder, Event, EventParser, EventTally, TallyHandler};
use crate::taxonomy::Taxonomy;
use crate::timeline::{SharedSettings, SharedTimeline, Timeline, TimelineSnapshot, TimelineTimers};

pub struct ParseSession {
    parser: Arc<EventParser>,
    timeline: SharedTimeline,
    settings: SharedSettings,
    tally: TallyHandler,
    timers: Option<TimelineTimers>,
}

impl ParseSession {
    pub fn new(taxonomy: Arc<Taxonomy>, settings: ParseSettings) -> Self {
        let parser = Arc::new(EventParser::new(taxonomy));
        let tally = TallyHandler::new();
        parser.add_known_handler(tally.clone());
        parser.add_unknown_handler(tally.clone());

        Self {
            parser,
            timeline: Timeline::shared(&settings),
            settings: Arc::new(RwLock::new(settings)),
            tally,
            timers: None,
        }
    }

    pub fn parser(&self) -> &Arc<EventParser> {
        &self.parser
    }

    pub fn timeline(&self) -> &SharedTimeline {
        &self.timeline
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Counts of everything classified so far.
    pub fn tally(&self) -> EventTally {
        self.tally.snapshot()
    }

    /// Receive every known event classified from here on.
    pub fn subscribe_known(&self) -> mpsc::UnboundedReceiver<Event> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.parser.add_known_handler(ChannelForwarder::new(tx));
        rx
    }

    /// Start the engagement and history timers. Requires a tokio runtime; no-op if running.
    pub fn start_timers(&mut self) {
        if self.timers.is_some() {
            return;
        }
        self.timers = Some(TimelineTimers::spawn(
            Arc::clone(&self.timeline),
            Arc::clone(&self.settings),
        ));
        tracing::debug!("Timeline timers started");
    }

    pub fn stop_timers(&mut self) {
        if let Some(timers) = self.timers.take() {
            timers.stop();
            tracing::debug!("Timeline timers stopped");
        }
    }

    pub fn parse_and_publish(&self, code: u32, line: impl Into<String>) {
        self.parser.parse_and_publish(code, line);
    }

    pub async fn publish_timeline_event(&self, event_type: TimelineEventType, args: &[&str]) {
        self.timeline
            .write()
            .await
            .publish_timeline_event(event_type, args);
    }

    pub async fn snapshot(&self) -> TimelineSnapshot {
        self.timeline.read().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::sets;
    use std::time::Duration;
    use xivparse_types::TimelineType;

    fn session() -> ParseSession {
        ParseSession::new(
            Arc::new(Taxonomy::bundled().unwrap()),
            ParseSettings::default(),
        )
    }

    #[tokio::test]
    async fn subscribers_receive_known_events() {
        let session = session();
        let mut rx = session.subscribe_known();

        session.parse_and_publish(0x000A29, "You hit the Ifrit.");
        session.parse_and_publish(0x00ABCD, "???");

        let event = rx.recv().await.unwrap();
        assert_eq!(event.line(), "You hit the Ifrit.");
        assert!(rx.try_recv().is_err());

        let tally = session.tally();
        assert_eq!(tally.known, 1);
        assert_eq!(tally.unknown, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_timers_drive_its_timeline() {
        let mut session = session();
        session.start_timers();
        session.start_timers();

        session
            .publish_timeline_event(TimelineEventType::PartyMonsterFighting, &["Ifrit"])
            .await;
        session
            .timeline()
            .write()
            .await
            .apply_player("Alys", TimelineType::You, sets::TOTAL_OVERALL_DAMAGE, 90.0)
            .unwrap();
        assert!(session.snapshot().await.fighting_right_now);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        let snapshot = session.snapshot().await;
        assert!(!snapshot.fighting_right_now);
        let alys = snapshot.party.child("Alys").unwrap();
        assert_eq!(alys.value(sets::TOTAL_OVERALL_DAMAGE), Some(90.0));

        session.stop_timers();
    }
}
