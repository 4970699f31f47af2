//! Session timeline: stat groups, fights, and the engaged/killed state machine.
//!
//! The timeline has no field for its state; it is derived from two flags:
//! - Idle: nothing engaged within the fighting timeout
//! - Engaged: a monster engagement was seen recently and no kill since
//! - PostKill: a kill was seen and no engagement since, on a timeline that has engaged since
//!   its last clear
//!
//! Timers live in [`timers`]. The timeline itself only stores deadlines and exposes the
//! callbacks the timer tasks invoke under the write lock.

mod observer;
pub mod timers;


pub use observer::{ChannelObserver, TimelineChangedEvent, TimelineObserver};
pub use timers::TimelineTimers;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Notify, RwLock};
use tokio::time::Instant;
use xivparse_types::{
    DEFAULT_STORE_HISTORY_INTERVAL_MS, ParseSettings, TimelineEventType, TimelineType,
};

use crate::fights::{Fight, FightRegistry};
use crate::stats::{Stat, StatError, StatGroup, StatGroupSnapshot, sets};

pub type SharedTimeline = Arc<RwLock<Timeline>>;
pub type SharedSettings = Arc<RwLock<ParseSettings>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimelineState {
    Idle,
    Engaged,
    PostKill,
}

/// Engaged time, summed over every stretch between an engage and its timeout. Never decreases
/// between resets.
#[derive(Debug, Default, Clone, Copy)]
struct ActiveTime {
    accumulated: Duration,
    segment_start: Option<Instant>,
}

impl ActiveTime {
    fn open(&mut self, now: Instant) {
        self.segment_start.get_or_insert(now);
    }

    fn close(&mut self, end: Instant) {
        if let Some(start) = self.segment_start.take() {
            self.accumulated += end.saturating_duration_since(start);
        }
    }

    fn seconds(&self, now: Instant) -> f64 {
        let open = self
            .segment_start
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        (self.accumulated + open).as_secs_f64()
    }

    fn reset(&mut self, now: Instant) {
        self.accumulated = Duration::ZERO;
        if self.segment_start.is_some() {
            self.segment_start = Some(now);
        }
    }
}

/// Names that are UI placeholders rather than monsters.
fn is_placeholder(name: &str) -> bool {
    name.is_empty() || name.to_lowercase().contains("target")
}

pub struct Timeline {
    overall: StatGroup,
    party: StatGroup,
    monster: StatGroup,
    fights: FightRegistry,

    fighting_right_now: bool,
    death_found: bool,
    engaged_since_clear: bool,
    last_engaged: Option<String>,
    last_killed: Option<String>,

    fighting_timeout: Duration,
    engagement_deadline: Option<Instant>,
    history_interval: Duration,
    active: ActiveTime,

    observers: Vec<Box<dyn TimelineObserver>>,
    rearm: Arc<Notify>,
}

impl Timeline {
    pub fn new(settings: &ParseSettings) -> Self {
        let mut party = StatGroup::new("Party");
        party.include_self = false;
        let mut monster = StatGroup::new("Monster");
        monster.include_self = false;

        let mut timeline = Self {
            overall: StatGroup::new("Overall"),
            party,
            monster,
            fights: FightRegistry::new(),
            fighting_right_now: false,
            death_found: false,
            engaged_since_clear: false,
            last_engaged: None,
            last_killed: None,
            fighting_timeout: settings.fighting_timeout(),
            engagement_deadline: None,
            history_interval: settings
                .store_history_interval()
                .unwrap_or(Duration::from_millis(DEFAULT_STORE_HISTORY_INTERVAL_MS)),
            active: ActiveTime::default(),
            observers: Vec::new(),
            rearm: Arc::new(Notify::new()),
        };
        timeline.init_stats();
        timeline
    }

    pub fn shared(settings: &ParseSettings) -> SharedTimeline {
        Arc::new(RwLock::new(Self::new(settings)))
    }

    fn init_stats(&mut self) {
        self.overall.remove_stats();
        if let Err(e) = self.overall.add_stats(sets::overall_stats()) {
            tracing::warn!(error = %e, "Failed to seed overall stats");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// A kill only reads as `PostKill` once the timeline has engaged since its last clear;
    /// a kill seen on a never-engaged timeline leaves it `Idle`.
    pub fn state(&self) -> TimelineState {
        if self.death_found && self.engaged_since_clear {
            TimelineState::PostKill
        } else if self.fighting_right_now {
            TimelineState::Engaged
        } else {
            TimelineState::Idle
        }
    }

    pub fn fighting_right_now(&self) -> bool {
        self.fighting_right_now
    }

    pub fn death_found(&self) -> bool {
        self.death_found
    }

    pub fn last_engaged(&self) -> Option<&str> {
        self.last_engaged.as_deref()
    }

    pub fn last_killed(&self) -> Option<&str> {
        self.last_killed.as_deref()
    }

    pub fn overall(&self) -> &StatGroup {
        &self.overall
    }

    pub fn party(&self) -> &StatGroup {
        &self.party
    }

    pub fn monster(&self) -> &StatGroup {
        &self.monster
    }

    pub fn fights(&self) -> &FightRegistry {
        &self.fights
    }

    pub fn engagement_deadline(&self) -> Option<Instant> {
        self.engagement_deadline
    }

    /// Interval the history timer last armed with.
    pub fn history_interval(&self) -> Duration {
        self.history_interval
    }

    /// Signalled whenever the engagement deadline moves.
    pub fn rearm_signal(&self) -> Arc<Notify> {
        Arc::clone(&self.rearm)
    }

    pub fn add_observer(&mut self, observer: impl TimelineObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Semantic events
    // ─────────────────────────────────────────────────────────────────────────

    pub fn publish_timeline_event(&mut self, event_type: TimelineEventType, args: &[&str]) {
        self.publish_timeline_event_at(Instant::now(), event_type, args);
    }

    pub fn publish_timeline_event_at(
        &mut self,
        now: Instant,
        event_type: TimelineEventType,
        args: &[&str],
    ) {
        tracing::debug!(
            "TimelineEvent : {} {}",
            event_type,
            args.first().copied().unwrap_or("(no args)")
        );

        let name = args.first().copied().unwrap_or_default();
        if event_type.is_fighting() {
            self.on_monster_fighting(now, name);
        } else if event_type.is_killed() {
            self.on_monster_killed(event_type.scope(), name);
        }

        let changed = TimelineChangedEvent {
            event_type,
            args: args.iter().map(|a| a.to_string()).collect(),
        };
        for observer in &mut self.observers {
            observer.timeline_changed(&changed);
        }
    }

    fn on_monster_fighting(&mut self, now: Instant, name: &str) {
        self.death_found = false;
        if is_placeholder(name) {
            tracing::debug!(name, "Ignoring placeholder engagement");
            return;
        }
        self.fights.get_or_add(name, chrono::Local::now().naive_local());
        self.last_engaged = Some(name.to_string());
        self.engage(now);
    }

    fn on_monster_killed(&mut self, scope: TimelineType, name: &str) {
        self.death_found = true;
        if is_placeholder(name) {
            tracing::debug!(name, "Ignoring placeholder kill");
            return;
        }
        let wall = chrono::Local::now().naive_local();
        self.fights.get_or_add(name, wall).mark_killed(wall);
        if let Some(group) = self.get_set_monster(name, scope)
            && let Err(e) = group.apply(sets::KILLS, 1.0)
        {
            tracing::warn!(error = %e, monster = name, "Failed to record kill");
        }
        self.last_killed = Some(name.to_string());
    }

    fn engage(&mut self, now: Instant) {
        if !self.fighting_right_now {
            tracing::info!("Engaged");
            self.fighting_right_now = true;
            self.engaged_since_clear = true;
            self.active.open(now);
        }
        self.engagement_deadline = Some(now + self.fighting_timeout);
        self.rearm.notify_one();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Timer callbacks
    // ─────────────────────────────────────────────────────────────────────────

    /// Engagement timeout callback. Drops `fighting_right_now` if the deadline has passed;
    /// returns whether it fired. A deadline pushed back since the timer woke is left alone.
    ///
    /// The active segment closes at `now`, so active seconds read before the timeout are never
    /// more than what is kept after it.
    pub fn expire_engagement_at(&mut self, now: Instant) -> bool {
        match self.engagement_deadline {
            Some(deadline) if now >= deadline => {}
            _ => return false,
        }
        self.engagement_deadline = None;
        self.fighting_right_now = false;
        self.active.close(now);

        let active_seconds = self.active.seconds(now);
        tracing::info!(active_secs = active_seconds, "Engagement timed out");
        for observer in &mut self.observers {
            observer.engagement_timed_out(active_seconds);
        }
        true
    }

    /// History timer callback. Clears an idle timeline when resets are enabled and returns the
    /// interval to rearm with.
    ///
    /// The interval is re-read from `settings` each time; an unparsable value keeps the
    /// previous one.
    pub fn on_history_timer(&mut self, settings: &ParseSettings) -> Duration {
        match settings.store_history_interval() {
            Some(interval) => self.history_interval = interval,
            None => tracing::warn!(
                value = %settings.store_history_interval,
                keeping_ms = self.history_interval.as_millis() as u64,
                "Invalid store history interval"
            ),
        }

        if settings.enable_store_history_reset
            && !self.fighting_right_now
            && !settings.history_based
        {
            self.clear();
        }
        self.history_interval
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stats
    // ─────────────────────────────────────────────────────────────────────────

    /// Get or create a monster's group. Alliance monsters are not tracked per entity.
    pub fn get_set_monster(&mut self, name: &str, kind: TimelineType) -> Option<&mut StatGroup> {
        if kind == TimelineType::Alliance {
            return None;
        }
        Some(
            self.monster
                .get_or_create_child_with(name, |group| seed(group, kind, sets::monster_stats())),
        )
    }

    /// Get or create a player's group. Alliance members are not tracked per entity.
    pub fn get_set_player(&mut self, name: &str, kind: TimelineType) -> Option<&mut StatGroup> {
        if kind == TimelineType::Alliance {
            return None;
        }
        Some(
            self.party
                .get_or_create_child_with(name, |group| seed(group, kind, sets::entity_stats())),
        )
    }

    pub fn apply_overall(&mut self, stat: &str, delta: f64) -> Result<f64, StatError> {
        self.overall.apply(stat, delta)
    }

    /// Apply to a player's stat. `Ok(None)` when the scope is not tracked per entity.
    pub fn apply_player(
        &mut self,
        name: &str,
        kind: TimelineType,
        stat: &str,
        delta: f64,
    ) -> Result<Option<f64>, StatError> {
        self.get_set_player(name, kind)
            .map(|group| group.apply(stat, delta))
            .transpose()
    }

    pub fn apply_monster(
        &mut self,
        name: &str,
        kind: TimelineType,
        stat: &str,
        delta: f64,
    ) -> Result<Option<f64>, StatError> {
        self.get_set_monster(name, kind)
            .map(|group| group.apply(stat, delta))
            .transpose()
    }

    pub fn active_seconds(&self, now: Instant) -> f64 {
        self.active.seconds(now)
    }

    pub fn overall_value(&self, stat: &str) -> Option<f64> {
        self.overall_value_at(Instant::now(), stat)
    }

    pub fn overall_value_at(&self, now: Instant, stat: &str) -> Option<f64> {
        self.overall.stat_value(stat, self.active_seconds(now))
    }

    /// Zero all groups, drop all fights, and re-seed the overall stat set.
    pub fn clear(&mut self) {
        self.clear_at(Instant::now());
    }

    pub fn clear_at(&mut self, now: Instant) {
        tracing::info!(fights = self.fights.len(), "Clearing timeline");
        self.overall.clear();
        self.party.clear();
        self.monster.clear();
        self.fights.clear();
        self.active.reset(now);
        self.engaged_since_clear = self.fighting_right_now;
        self.init_stats();
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> TimelineSnapshot {
        let active_seconds = self.active_seconds(now);
        TimelineSnapshot {
            state: self.state(),
            fighting_right_now: self.fighting_right_now,
            death_found: self.death_found,
            last_engaged: self.last_engaged.clone(),
            last_killed: self.last_killed.clone(),
            active_seconds,
            overall: self.overall.snapshot(active_seconds),
            party: self.party.snapshot(active_seconds),
            monster: self.monster.snapshot(active_seconds),
            fights: self.fights.iter().cloned().collect(),
        }
    }
}

fn seed(group: &mut StatGroup, kind: TimelineType, stats: Vec<Stat>) {
    tracing::info!(group = group.name(), %kind, "New entity group");
    group.set_kind(kind);
    if let Err(e) = group.add_stats(stats) {
        tracing::warn!(error = %e, group = group.name(), "Failed to seed entity stats");
    }
}

/// Point-in-time copy of the timeline for readers outside the lock.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineSnapshot {
    pub state: TimelineState,
    pub fighting_right_now: bool,
    pub death_found: bool,
    pub last_engaged: Option<String>,
    pub last_killed: Option<String>,
    pub active_seconds: f64,
    pub overall: StatGroupSnapshot,
    pub party: StatGroupSnapshot,
    pub monster: StatGroupSnapshot,
    pub fights: Vec<Fight>,
}
