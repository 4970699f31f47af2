use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of thing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Damage,
    Failed,
    Actions,
    Items,
    Cure,
    /// Older chat code documents spell this `Benficial`.
    #[serde(alias = "Benficial")]
    Beneficial,
    Detrimental,
    Chat,
}

/// Who caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventSubject {
    You,
    Party,
    Other,
    #[serde(rename = "NPC")]
    Npc,
    Engaged,
    UnEngaged,
}

/// Who it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventDirection {
    #[serde(rename = "Self")]
    SelfTarget,
    Party,
    Other,
    #[serde(rename = "NPC")]
    Npc,
    Engaged,
    UnEngaged,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Damage => "Damage",
            Self::Failed => "Failed",
            Self::Actions => "Actions",
            Self::Items => "Items",
            Self::Cure => "Cure",
            Self::Beneficial => "Beneficial",
            Self::Detrimental => "Detrimental",
            Self::Chat => "Chat",
        }
    }
}

impl EventSubject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::You => "You",
            Self::Party => "Party",
            Self::Other => "Other",
            Self::Npc => "NPC",
            Self::Engaged => "Engaged",
            Self::UnEngaged => "UnEngaged",
        }
    }
}

impl EventDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfTarget => "Self",
            Self::Party => "Party",
            Self::Other => "Other",
            Self::Npc => "NPC",
            Self::Engaged => "Engaged",
            Self::UnEngaged => "UnEngaged",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EventDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
