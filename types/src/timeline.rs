use std::fmt;

use serde::{Deserialize, Serialize};

/// Which scope an entity stat group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineType {
    You,
    Party,
    Alliance,
}

/// Semantic events published to the timeline after a raw log event has been interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineEventType {
    PartyJoin,
    PartyDisband,
    PartyLeave,
    PartyMonsterFighting,
    AllianceMonsterFighting,
    PartyMonsterKilled,
    AllianceMonsterKilled,
}

impl TimelineEventType {
    pub fn is_fighting(&self) -> bool {
        matches!(
            self,
            Self::PartyMonsterFighting | Self::AllianceMonsterFighting
        )
    }

    pub fn is_killed(&self) -> bool {
        matches!(self, Self::PartyMonsterKilled | Self::AllianceMonsterKilled)
    }

    /// Scope whose monster group a kill is recorded against.
    pub fn scope(&self) -> TimelineType {
        match self {
            Self::AllianceMonsterFighting | Self::AllianceMonsterKilled => TimelineType::Alliance,
            _ => TimelineType::Party,
        }
    }
}

impl fmt::Display for TimelineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::You => "You",
            Self::Party => "Party",
            Self::Alliance => "Alliance",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TimelineEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PartyJoin => "PartyJoin",
            Self::PartyDisband => "PartyDisband",
            Self::PartyLeave => "PartyLeave",
            Self::PartyMonsterFighting => "PartyMonsterFighting",
            Self::AllianceMonsterFighting => "AllianceMonsterFighting",
            Self::PartyMonsterKilled => "PartyMonsterKilled",
            Self::AllianceMonsterKilled => "AllianceMonsterKilled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kill_scope_follows_event_prefix() {
        assert_eq!(TimelineEventType::PartyMonsterKilled.scope(), TimelineType::Party);
        assert_eq!(
            TimelineEventType::AllianceMonsterKilled.scope(),
            TimelineType::Alliance
        );
        assert!(TimelineEventType::AllianceMonsterFighting.is_fighting());
        assert!(!TimelineEventType::PartyJoin.is_killed());
    }
}
