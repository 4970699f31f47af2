//! Event code taxonomy
//!
//! The chat code document describes a tree of groups. Each group may tag one or more of
//! three axes (type, subject, direction); leaves are 24-bit event codes. At load time the
//! tree is walked once, every code gets the axes of its nearest tagged ancestors, and the
//! codes are flattened into an ordered index for lookup.
//!
//! ```text
//! All
//! └── Damage            Type=Damage
//!     └── You           Subject=You
//!         └── ToNPC     Direction=NPC
//!             └── 0x000A29  "You hit an enemy"   => Damage / You / NPC
//! ```

mod code;
mod group;
mod loader;

pub use code::{
    ALL_EVENTS, DIRECTION_MASK, EventCode, SUBJECT_MASK, TYPE_MASK, UNKNOWN_EVENT,
};
pub use group::{Axes, EventGroup, GroupId};
pub use loader::TaxonomyError;

use std::collections::BTreeMap;
use std::path::Path;

/// The chat code document shipped with the crate.
pub const BUNDLED_CHAT_CODES: &str = include_str!("../../data/chat_codes.xml");

/// Loaded, immutable classification space.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    groups: Vec<EventGroup>,
    codes: BTreeMap<u32, EventCode>,
    unknown: EventCode,
}

impl Taxonomy {
    /// Parse a chat code document.
    pub fn from_xml(xml: &str) -> Result<Self, TaxonomyError> {
        let (groups, codes) = loader::load(xml)?;
        tracing::info!(
            groups = groups.len(),
            codes = codes.len(),
            "Loaded event taxonomy"
        );
        Ok(Self {
            groups,
            codes,
            unknown: EventCode::unknown(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, TaxonomyError> {
        let xml = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&xml)
    }

    /// Load the bundled chat code document.
    pub fn bundled() -> Result<Self, TaxonomyError> {
        Self::from_xml(BUNDLED_CHAT_CODES)
    }

    pub fn root(&self) -> &EventGroup {
        &self.groups[GroupId::ROOT.index()]
    }

    pub fn group(&self, id: GroupId) -> Option<&EventGroup> {
        self.groups.get(id.index())
    }

    pub fn groups(&self) -> impl Iterator<Item = &EventGroup> {
        self.groups.iter()
    }

    pub fn children(&self, id: GroupId) -> impl Iterator<Item = &EventGroup> {
        self.group(id)
            .into_iter()
            .flat_map(|g| g.children().iter())
            .filter_map(|child| self.group(*child))
    }

    /// Find a direct child of `parent` by name.
    pub fn child_by_name(&self, parent: GroupId, name: &str) -> Option<&EventGroup> {
        self.children(parent).find(|g| g.name() == name)
    }

    /// Slash separated path from the root, e.g. `All/Damage/You`.
    pub fn group_path(&self, id: GroupId) -> String {
        let mut names = Vec::new();
        let mut current = self.group(id);
        while let Some(group) = current {
            names.push(group.name());
            current = group.parent().and_then(|p| self.group(p));
        }
        names.reverse();
        names.join("/")
    }

    pub fn lookup(&self, code: u32) -> Option<&EventCode> {
        self.codes.get(&code)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.codes.contains_key(&code)
    }

    /// Sentinel returned for codes that are not in the document.
    pub fn unknown(&self) -> &EventCode {
        &self.unknown
    }

    /// All codes in ascending key order.
    pub fn codes(&self) -> impl Iterator<Item = &EventCode> {
        self.codes.values()
    }

    /// Codes declared directly in `group` (not in its descendants).
    pub fn codes_in_group(&self, group: GroupId) -> impl Iterator<Item = &EventCode> {
        self.codes.values().filter(move |c| c.group() == Some(group))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xivparse_types::{EventDirection, EventSubject, EventType};

    #[test]
    fn bundled_document_loads() {
        let taxonomy = Taxonomy::bundled().unwrap();
        assert!(!taxonomy.is_empty());
        assert_eq!(taxonomy.root().name(), "All");
        assert!(taxonomy.root().parent().is_none());
    }

    #[test]
    fn bundled_document_resolves_damage_axes() {
        let taxonomy = Taxonomy::bundled().unwrap();
        let code = taxonomy.lookup(0x000A29).unwrap();
        assert_eq!(code.axes().kind, Some(EventType::Damage));
        assert_eq!(code.axes().subject, Some(EventSubject::You));
        assert_eq!(code.axes().direction, Some(EventDirection::Npc));
        let path = taxonomy.group_path(code.group().unwrap());
        assert!(path.starts_with("All/Damage"), "{path}");
    }

    #[test]
    fn bundled_document_has_no_unknown_key() {
        let taxonomy = Taxonomy::bundled().unwrap();
        assert!(!taxonomy.contains(UNKNOWN_EVENT));
        assert!(taxonomy.codes().all(|c| c.code() <= ALL_EVENTS));
    }

    #[test]
    fn children_follow_document_order() {
        let xml = r#"
<Codes>
  <Group Name="B"><Code Key="000002"><Description>b</Description></Code></Group>
  <Group Name="A"><Code Key="000001"><Description>a</Description></Code></Group>
</Codes>"#;
        let taxonomy = Taxonomy::from_xml(xml).unwrap();
        let names: Vec<_> = taxonomy
            .children(GroupId::ROOT)
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, ["B", "A"]);
        let b = taxonomy.child_by_name(GroupId::ROOT, "B").unwrap();
        assert_eq!(taxonomy.codes_in_group(b.id()).count(), 1);
    }
}
