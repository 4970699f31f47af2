//! Chat code document parsing.
//!
//! Document shape:
//!
//! ```xml
//! <Codes>
//!   <Group Name="Damage" Type="Damage">
//!     <Group Name="You" Subject="You">
//!       <Code Key="000A29"><Description>You hit an enemy</Description></Code>
//!     </Group>
//!   </Group>
//! </Codes>
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use quick_xml::de::from_str;
use serde::Deserialize;
use thiserror::Error;
use xivparse_types::{EventDirection, EventSubject, EventType};

use super::code::{ALL_EVENTS, EventCode, UNKNOWN_EVENT};
use super::group::{Axes, EventGroup, GroupId};

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed taxonomy document: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("group under {parent:?} has no name")]
    EmptyGroupName { parent: String },
    #[error("duplicate group {name:?} under {parent:?}")]
    DuplicateGroup { name: String, parent: String },
    #[error("invalid event code key {key:?} in group {group:?}")]
    InvalidKey { key: String, group: String },
    #[error("event code {code:#x} in group {group:?} does not fit in 24 bits")]
    KeyOutOfRange { code: u32, group: String },
    #[error("event code 0x000000 in group {group:?} is reserved for unknown events")]
    ReservedKey { group: String },
    #[error("duplicate event code {code:#08x} in group {group:?}")]
    DuplicateCode { code: u32, group: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// XML Deserialization Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct XmlDocument {
    #[serde(rename = "Group", default)]
    groups: Vec<XmlGroup>,
}

#[derive(Debug, Deserialize)]
struct XmlGroup {
    #[serde(rename = "@Name", default)]
    name: String,
    #[serde(rename = "@Type", default)]
    kind: Option<EventType>,
    #[serde(rename = "@Subject", default)]
    subject: Option<EventSubject>,
    #[serde(rename = "@Direction", default)]
    direction: Option<EventDirection>,
    #[serde(rename = "Group", default)]
    groups: Vec<XmlGroup>,
    #[serde(rename = "Code", default)]
    codes: Vec<XmlCode>,
}

#[derive(Debug, Deserialize)]
struct XmlCode {
    #[serde(rename = "@Key")]
    key: String,
    #[serde(rename = "Description", default)]
    description: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Building
// ─────────────────────────────────────────────────────────────────────────────

struct Builder {
    groups: Vec<EventGroup>,
    codes: BTreeMap<u32, EventCode>,
}

pub(super) fn load(xml: &str) -> Result<(Vec<EventGroup>, BTreeMap<u32, EventCode>), TaxonomyError> {
    let document: XmlDocument = from_str(xml)?;

    let mut builder = Builder {
        groups: vec![EventGroup::root()],
        codes: BTreeMap::new(),
    };
    for group in &document.groups {
        builder.load_group(group, GroupId::ROOT)?;
    }
    Ok((builder.groups, builder.codes))
}

impl Builder {
    /// Depth first: nested groups before this group's own codes.
    fn load_group(&mut self, node: &XmlGroup, parent: GroupId) -> Result<(), TaxonomyError> {
        let parent_group = &self.groups[parent.index()];
        let name = node.name.trim();
        if name.is_empty() {
            return Err(TaxonomyError::EmptyGroupName {
                parent: parent_group.name().to_string(),
            });
        }
        let sibling_exists = parent_group
            .children()
            .iter()
            .any(|c| self.groups[c.index()].name() == name);
        if sibling_exists {
            return Err(TaxonomyError::DuplicateGroup {
                name: name.to_string(),
                parent: parent_group.name().to_string(),
            });
        }

        let declared = Axes {
            kind: node.kind,
            subject: node.subject,
            direction: node.direction,
        };
        let id = GroupId::new(self.groups.len());
        let group = EventGroup::new(id, name.to_string(), parent_group, declared);
        let axes = group.axes();
        self.groups.push(group);
        self.groups[parent.index()].push_child(id);

        for child in &node.groups {
            self.load_group(child, id)?;
        }

        for code in &node.codes {
            let key = parse_key(&code.key).ok_or_else(|| TaxonomyError::InvalidKey {
                key: code.key.clone(),
                group: name.to_string(),
            })?;
            if key > ALL_EVENTS {
                return Err(TaxonomyError::KeyOutOfRange {
                    code: key,
                    group: name.to_string(),
                });
            }
            if key == UNKNOWN_EVENT {
                return Err(TaxonomyError::ReservedKey {
                    group: name.to_string(),
                });
            }
            if self.codes.contains_key(&key) {
                return Err(TaxonomyError::DuplicateCode {
                    code: key,
                    group: name.to_string(),
                });
            }
            let description = code.description.trim();
            self.codes
                .insert(key, EventCode::new(key, description, id, axes));
        }

        Ok(())
    }
}

fn parse_key(key: &str) -> Option<u32> {
    let key = key.trim();
    let digits = key
        .strip_prefix("0x")
        .or_else(|| key.strip_prefix("0X"))
        .unwrap_or(key);
    u32::from_str_radix(digits, 16).ok()
}
