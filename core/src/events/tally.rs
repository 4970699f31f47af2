use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::taxonomy::GroupId;

use super::{Event, EventHandler};

/// Running counts of classified events, per declaring group and per unknown code.
#[derive(Debug, Clone, Default)]
pub struct EventTally {
    pub known: u64,
    pub unknown: u64,
    pub by_group: BTreeMap<GroupId, u64>,
    pub unknown_codes: BTreeMap<u32, u64>,
}

impl EventTally {
    pub fn record(&mut self, event: &Event) {
        match event.group() {
            Some(group) => {
                self.known += 1;
                *self.by_group.entry(group).or_default() += 1;
            }
            None => {
                self.unknown += 1;
                *self.unknown_codes.entry(event.raw_code()).or_default() += 1;
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.known + self.unknown
    }
}

/// Handler that records into a shared tally. Register the same handler on both channels.
#[derive(Debug, Clone, Default)]
pub struct TallyHandler {
    tally: Arc<Mutex<EventTally>>,
}

impl TallyHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the counts so far.
    pub fn snapshot(&self) -> EventTally {
        self.tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventHandler for TallyHandler {
    fn handle_event(&mut self, event: &Event) {
        self.tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(event);
    }
}
