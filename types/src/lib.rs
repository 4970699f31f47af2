//! Shared types for xivparse.
//!
//! Everything in here is plain data: the taxonomy axis enums read from the chat code
//! document, the timeline event vocabulary consumed by observers, and the parse settings
//! persisted by the host application.

pub mod formatting;
mod settings;
mod taxonomy;
mod timeline;

pub use settings::{
    DEFAULT_FIGHTING_TIMEOUT_MS, DEFAULT_STORE_HISTORY_INTERVAL_MS, ParseSettings,
};
pub use taxonomy::{EventDirection, EventSubject, EventType};
pub use timeline::{TimelineEventType, TimelineType};
