use xivparse_types::{EventDirection, EventSubject, EventType};

/// Index of a group inside its [`Taxonomy`](super::Taxonomy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    /// The synthetic "All" group every document hangs from.
    pub const ROOT: GroupId = GroupId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The three classification axes. `None` means no group on the path tagged that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Axes {
    pub kind: Option<EventType>,
    pub subject: Option<EventSubject>,
    pub direction: Option<EventDirection>,
}

impl Axes {
    /// Axes seen by a child: the child's own tags win, the rest come from `self`.
    pub fn overlay(self, child: Axes) -> Axes {
        Axes {
            kind: child.kind.or(self.kind),
            subject: child.subject.or(self.subject),
            direction: child.direction.or(self.direction),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventGroup {
    id: GroupId,
    name: String,
    parent: Option<GroupId>,
    children: Vec<GroupId>,
    /// Tags written on this group in the document.
    declared: Axes,
    /// Tags after inheritance from ancestors.
    resolved: Axes,
}

impl EventGroup {
    pub(crate) fn root() -> Self {
        Self {
            id: GroupId::ROOT,
            name: "All".to_string(),
            parent: None,
            children: Vec::new(),
            declared: Axes::default(),
            resolved: Axes::default(),
        }
    }

    pub(crate) fn new(id: GroupId, name: String, parent: &EventGroup, declared: Axes) -> Self {
        Self {
            id,
            name,
            parent: Some(parent.id),
            children: Vec::new(),
            declared,
            resolved: parent.resolved.overlay(declared),
        }
    }

    pub(crate) fn push_child(&mut self, child: GroupId) {
        self.children.push(child);
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<GroupId> {
        self.parent
    }

    pub fn children(&self) -> &[GroupId] {
        &self.children
    }

    pub fn declared(&self) -> Axes {
        self.declared
    }

    pub fn axes(&self) -> Axes {
        self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_only_replaces_declared_axes() {
        let parent = Axes {
            kind: Some(EventType::Damage),
            subject: Some(EventSubject::You),
            direction: None,
        };
        let child = Axes {
            subject: Some(EventSubject::Party),
            direction: Some(EventDirection::Npc),
            ..Default::default()
        };
        let resolved = parent.overlay(child);
        assert_eq!(resolved.kind, Some(EventType::Damage));
        assert_eq!(resolved.subject, Some(EventSubject::Party));
        assert_eq!(resolved.direction, Some(EventDirection::Npc));
    }
}
