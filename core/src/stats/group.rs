use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use xivparse_types::TimelineType;

use super::{Stat, StatError, TotalStat};

/// Named stats and named child groups, both kept in insertion order.
#[derive(Debug, Clone)]
pub struct StatGroup {
    name: String,
    /// Whether the owning actor's own contributions count toward the parent aggregate.
    pub include_self: bool,
    kind: Option<TimelineType>,
    stats: Vec<Stat>,
    stat_index: HashMap<String, usize>,
    children: Vec<StatGroup>,
    child_index: HashMap<String, usize>,
}

impl StatGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_self: true,
            kind: None,
            stats: Vec::new(),
            stat_index: HashMap::new(),
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scope tag for entity groups created by the timeline.
    pub fn kind(&self) -> Option<TimelineType> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: TimelineType) {
        self.kind = Some(kind);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stats
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert stats by name. A repeated name replaces the earlier stat in place.
    ///
    /// A derived stat's source must already be a total in this group (earlier entries of
    /// `stats` count). Stops at the first stat that breaks this.
    pub fn add_stats(&mut self, stats: impl IntoIterator<Item = Stat>) -> Result<(), StatError> {
        for stat in stats {
            if let Stat::PerSecondAverage(derived) = &stat
                && self.total(derived.source()).is_none()
            {
                return Err(StatError::MissingSource {
                    stat: derived.name().to_string(),
                    source_name: derived.source().to_string(),
                });
            }
            match self.stat_index.get(stat.name()) {
                Some(&idx) => self.stats[idx] = stat,
                None => {
                    self.stat_index
                        .insert(stat.name().to_string(), self.stats.len());
                    self.stats.push(stat);
                }
            }
        }
        Ok(())
    }

    pub fn stat(&self, name: &str) -> Option<&Stat> {
        self.stat_index.get(name).map(|&idx| &self.stats[idx])
    }

    pub fn total(&self, name: &str) -> Option<&TotalStat> {
        match self.stat(name)? {
            Stat::Total(total) => Some(total),
            Stat::PerSecondAverage(_) => None,
        }
    }

    /// Current value of a stat; derived stats are computed against `active_seconds`.
    pub fn stat_value(&self, name: &str, active_seconds: f64) -> Option<f64> {
        match self.stat(name)? {
            Stat::Total(total) => Some(total.value()),
            Stat::PerSecondAverage(derived) => {
                let source = self.total(derived.source())?;
                Some(derived.value(source.value(), active_seconds))
            }
        }
    }

    /// Apply a delta to a total. Returns the new value.
    pub fn apply(&mut self, name: &str, delta: f64) -> Result<f64, StatError> {
        let idx = *self
            .stat_index
            .get(name)
            .ok_or_else(|| StatError::UnknownStat(name.to_string()))?;
        match &mut self.stats[idx] {
            Stat::Total(total) => Ok(total.apply(delta)),
            Stat::PerSecondAverage(_) => Err(StatError::NotATotal(name.to_string())),
        }
    }

    pub fn stats(&self) -> impl Iterator<Item = &Stat> {
        self.stats.iter()
    }

    pub fn stat_names(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(Stat::name)
    }

    /// Drop every stat definition (children untouched).
    pub fn remove_stats(&mut self) {
        self.stats.clear();
        self.stat_index.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────────────────────

    pub fn try_get_group(&self, name: &str) -> Option<&StatGroup> {
        self.child_index.get(name).map(|&idx| &self.children[idx])
    }

    pub fn try_get_group_mut(&mut self, name: &str) -> Option<&mut StatGroup> {
        let idx = *self.child_index.get(name)?;
        Some(&mut self.children[idx])
    }

    /// Register `group` under its own name, replacing any child already using it.
    pub fn add_group(&mut self, group: StatGroup) -> &mut StatGroup {
        let idx = match self.child_index.get(group.name()) {
            Some(&idx) => {
                self.children[idx] = group;
                idx
            }
            None => self.push_child(group),
        };
        &mut self.children[idx]
    }

    pub fn get_or_create_child(&mut self, name: &str) -> &mut StatGroup {
        self.get_or_create_child_with(name, |_| {})
    }

    /// Like [`get_or_create_child`](Self::get_or_create_child), running `init` on a newly
    /// created group before it is registered.
    pub fn get_or_create_child_with(
        &mut self,
        name: &str,
        init: impl FnOnce(&mut StatGroup),
    ) -> &mut StatGroup {
        let idx = match self.child_index.get(name) {
            Some(&idx) => idx,
            None => {
                let mut group = StatGroup::new(name);
                init(&mut group);
                self.push_child(group)
            }
        };
        &mut self.children[idx]
    }

    pub fn children(&self) -> impl Iterator<Item = &StatGroup> {
        self.children.iter()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn push_child(&mut self, group: StatGroup) -> usize {
        let idx = self.children.len();
        self.child_index.insert(group.name().to_string(), idx);
        self.children.push(group);
        idx
    }

    /// Zero every stat here and in every descendant. Structure is kept.
    pub fn clear(&mut self) {
        for stat in &mut self.stats {
            stat.reset();
        }
        for child in &mut self.children {
            child.clear();
        }
    }

    pub fn snapshot(&self, active_seconds: f64) -> StatGroupSnapshot {
        StatGroupSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            include_self: self.include_self,
            stats: self
                .stats
                .iter()
                .map(|stat| StatValue {
                    name: stat.name().to_string(),
                    value: self.stat_value(stat.name(), active_seconds).unwrap_or(0.0),
                    derived: stat.is_derived(),
                })
                .collect(),
            children: self
                .children
                .iter()
                .map(|c| c.snapshot(active_seconds))
                .collect(),
        }
    }
}

/// Read-only copy of a stat group for UI and history export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGroupSnapshot {
    pub name: String,
    pub kind: Option<TimelineType>,
    pub include_self: bool,
    pub stats: Vec<StatValue>,
    pub children: Vec<StatGroupSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub name: String,
    pub value: f64,
    pub derived: bool,
}

impl StatGroupSnapshot {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn child(&self, name: &str) -> Option<&StatGroupSnapshot> {
        self.children.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damage_group() -> StatGroup {
        let total = TotalStat::new("Damage");
        let dps = Stat::per_second("DPS", &total);
        let mut group = StatGroup::new("Overall");
        group.add_stats([Stat::Total(total), dps]).unwrap();
        group
    }

    #[test]
    fn get_or_create_child_is_idempotent() {
        let mut group = StatGroup::new("Party");
        let first: *const StatGroup = group.get_or_create_child("Alys");
        let second: *const StatGroup = group.get_or_create_child("Alys");
        assert!(std::ptr::eq(first, second));
        assert_eq!(group.child_count(), 1);
    }

    #[test]
    fn get_or_create_child_keeps_existing_state() {
        let mut group = StatGroup::new("Party");
        group
            .get_or_create_child("Alys")
            .add_stats([Stat::total("Damage")])
            .unwrap();
        group.get_or_create_child("Alys").apply("Damage", 10.0).unwrap();
        group.get_or_create_child("Bram");

        let names: Vec<_> = group.children().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["Alys", "Bram"]);
        assert_eq!(
            group.try_get_group("Alys").unwrap().stat_value("Damage", 1.0),
            Some(10.0)
        );
    }

    #[test]
    fn init_runs_only_on_creation() {
        let mut group = StatGroup::new("Monster");
        let mut calls = 0;
        group.get_or_create_child_with("Ifrit", |g| {
            calls += 1;
            g.set_kind(TimelineType::Party);
        });
        group.get_or_create_child_with("Ifrit", |_| calls += 1);
        assert_eq!(calls, 1);
        assert_eq!(
            group.try_get_group("Ifrit").unwrap().kind(),
            Some(TimelineType::Party)
        );
    }

    #[test]
    fn missing_lookup_is_none() {
        let group = StatGroup::new("Party");
        assert!(group.try_get_group("nobody").is_none());
        assert!(group.stat("nothing").is_none());
        assert_eq!(group.stat_value("nothing", 1.0), None);
    }

    #[test]
    fn derived_stat_requires_existing_source() {
        let orphan_source = TotalStat::new("Healing");
        let mut group = StatGroup::new("Overall");
        let err = group
            .add_stats([Stat::per_second("HPS", &orphan_source)])
            .unwrap_err();
        assert_eq!(
            err,
            StatError::MissingSource {
                stat: "HPS".to_string(),
                source_name: "Healing".to_string(),
            }
        );
        assert!(group.stat("HPS").is_none());
    }

    #[test]
    fn duplicate_stat_name_overwrites_in_place() {
        let mut group = damage_group();
        group.apply("Damage", 500.0).unwrap();
        group.add_stats([Stat::total("Damage")]).unwrap();
        assert_eq!(group.stat_value("Damage", 1.0), Some(0.0));
        let names: Vec<_> = group.stat_names().collect();
        assert_eq!(names, ["Damage", "DPS"]);
    }

    #[test]
    fn derived_value_reads_through_to_source() {
        let mut group = damage_group();
        group.apply("Damage", 1_000.0).unwrap();
        assert_eq!(group.stat_value("DPS", 10.0), Some(100.0));
        assert_eq!(group.stat_value("DPS", 10.0), Some(100.0));
        assert_eq!(group.stat_value("DPS", 0.0), Some(0.0));
    }

    #[test]
    fn apply_rejects_unknown_and_derived() {
        let mut group = damage_group();
        assert_eq!(
            group.apply("Nope", 1.0),
            Err(StatError::UnknownStat("Nope".to_string()))
        );
        assert_eq!(
            group.apply("DPS", 1.0),
            Err(StatError::NotATotal("DPS".to_string()))
        );
    }

    #[test]
    fn clear_resets_recursively_without_removing() {
        let mut group = damage_group();
        group.apply("Damage", 42.0).unwrap();
        let child = group.get_or_create_child("Alys");
        child.add_stats([Stat::total("Damage")]).unwrap();
        child.apply("Damage", 7.0).unwrap();

        group.clear();

        assert_eq!(group.stat_value("Damage", 1.0), Some(0.0));
        assert_eq!(group.stat_names().count(), 2);
        let child = group.try_get_group("Alys").unwrap();
        assert_eq!(child.stat_value("Damage", 1.0), Some(0.0));
    }

    #[test]
    fn add_group_replaces_same_name() {
        let mut group = StatGroup::new("Party");
        group.get_or_create_child("Alys").include_self = true;
        let mut replacement = StatGroup::new("Alys");
        replacement.include_self = false;
        group.add_group(replacement);
        assert_eq!(group.child_count(), 1);
        assert!(!group.try_get_group("Alys").unwrap().include_self);
    }

    #[test]
    fn snapshot_captures_derived_values_and_children() {
        let mut group = damage_group();
        group.apply("Damage", 300.0).unwrap();
        group.get_or_create_child("Alys");

        let snapshot = group.snapshot(3.0);
        assert_eq!(snapshot.value("Damage"), Some(300.0));
        assert_eq!(snapshot.value("DPS"), Some(100.0));
        assert!(snapshot.stats[1].derived);
        assert!(snapshot.child("Alys").is_some());

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StatGroupSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
