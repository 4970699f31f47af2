//! Encounters against named monsters.

use chrono::{NaiveDateTime, TimeDelta};
use hashbrown::HashMap;
use serde::Serialize;

/// One tracked encounter, created on the first engage (or kill) seen for a monster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fight {
    name: String,
    engaged_at: NaiveDateTime,
    killed_at: Option<NaiveDateTime>,
}

impl Fight {
    pub fn new(name: impl Into<String>, engaged_at: NaiveDateTime) -> Self {
        Self {
            name: name.into(),
            engaged_at,
            killed_at: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engaged_at(&self) -> NaiveDateTime {
        self.engaged_at
    }

    pub fn killed_at(&self) -> Option<NaiveDateTime> {
        self.killed_at
    }

    pub fn is_killed(&self) -> bool {
        self.killed_at.is_some()
    }

    /// Record the kill. A second kill for the same fight keeps the first timestamp.
    pub fn mark_killed(&mut self, at: NaiveDateTime) {
        self.killed_at.get_or_insert(at);
    }

    /// Engage to kill, or engage to `now` while still alive.
    pub fn duration(&self, now: NaiveDateTime) -> TimeDelta {
        self.killed_at.unwrap_or(now) - self.engaged_at
    }
}

/// Fights keyed by monster name, in first-engagement order.
#[derive(Debug, Default, Clone)]
pub struct FightRegistry {
    fights: Vec<Fight>,
    index: HashMap<String, usize>,
}

impl FightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_get(&self, name: &str) -> Option<&Fight> {
        self.index.get(name).map(|&idx| &self.fights[idx])
    }

    pub fn try_get_mut(&mut self, name: &str) -> Option<&mut Fight> {
        let idx = *self.index.get(name)?;
        Some(&mut self.fights[idx])
    }

    /// Append `fight`. Returns false, leaving the registry untouched, if the name is taken.
    pub fn add(&mut self, fight: Fight) -> bool {
        if self.index.contains_key(fight.name()) {
            return false;
        }
        self.index.insert(fight.name().to_string(), self.fights.len());
        self.fights.push(fight);
        true
    }

    pub fn get_or_add(&mut self, name: &str, now: NaiveDateTime) -> &mut Fight {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                tracing::debug!(fight = name, "New fight");
                self.index.insert(name.to_string(), self.fights.len());
                self.fights.push(Fight::new(name, now));
                self.fights.len() - 1
            }
        };
        &mut self.fights[idx]
    }

    pub fn clear(&mut self) {
        self.fights.clear();
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.fights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fight> {
        self.fights.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn add_rejects_duplicate_names() {
        let mut registry = FightRegistry::new();
        assert!(registry.add(Fight::new("Ifrit", at(20, 0, 0))));
        assert!(!registry.add(Fight::new("Ifrit", at(20, 5, 0))));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.try_get("Ifrit").unwrap().engaged_at(), at(20, 0, 0));
    }

    #[test]
    fn iteration_follows_first_engagement() {
        let mut registry = FightRegistry::new();
        let now = Local::now().naive_local();
        registry.get_or_add("Titan", now);
        registry.get_or_add("Garuda", now);
        registry.get_or_add("Titan", now);
        let names: Vec<_> = registry.iter().map(Fight::name).collect();
        assert_eq!(names, ["Titan", "Garuda"]);
    }

    #[test]
    fn missing_fight_is_none() {
        let registry = FightRegistry::new();
        assert!(registry.try_get("Leviathan").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = FightRegistry::new();
        registry.get_or_add("Ifrit", at(20, 0, 0));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.try_get("Ifrit").is_none());
        assert!(registry.add(Fight::new("Ifrit", at(21, 0, 0))));
    }

    #[test]
    fn kill_timestamp_is_sticky() {
        let mut fight = Fight::new("Ifrit", at(20, 0, 0));
        assert!(!fight.is_killed());
        assert_eq!(fight.duration(at(20, 0, 30)), TimeDelta::seconds(30));

        fight.mark_killed(at(20, 2, 0));
        fight.mark_killed(at(20, 9, 0));
        assert!(fight.is_killed());
        assert_eq!(fight.killed_at(), Some(at(20, 2, 0)));
        assert_eq!(fight.duration(at(23, 0, 0)), TimeDelta::seconds(120));
    }
}
