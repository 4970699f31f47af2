use std::sync::Arc;

use super::group::{Axes, GroupId};

pub const DIRECTION_MASK: u32 = 0x00003F;
pub const SUBJECT_MASK: u32 = 0x000FC0;
pub const TYPE_MASK: u32 = 0x0FF000;
pub const ALL_EVENTS: u32 = 0xFFFFFF;
pub const UNKNOWN_EVENT: u32 = 0x000000;

/// A leaf of the taxonomy.
///
/// Cheap to clone: the description is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCode {
    code: u32,
    description: Arc<str>,
    group: Option<GroupId>,
    axes: Axes,
}

impl EventCode {
    pub(crate) fn new(code: u32, description: &str, group: GroupId, axes: Axes) -> Self {
        Self {
            code,
            description: Arc::from(description),
            group: Some(group),
            axes,
        }
    }

    /// The lookup-miss sentinel: code 0, no group, no axes.
    pub fn unknown() -> Self {
        Self {
            code: UNKNOWN_EVENT,
            description: Arc::from(""),
            group: None,
            axes: Axes::default(),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn axes(&self) -> Axes {
        self.axes
    }

    pub fn is_unknown(&self) -> bool {
        self.group.is_none()
    }

    pub fn direction_bits(&self) -> u32 {
        self.code & DIRECTION_MASK
    }

    pub fn subject_bits(&self) -> u32 {
        (self.code & SUBJECT_MASK) >> 6
    }

    pub fn type_bits(&self) -> u32 {
        (self.code & TYPE_MASK) >> 12
    }
}
