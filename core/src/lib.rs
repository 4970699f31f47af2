pub mod events;
pub mod fights;
pub mod session;
pub mod stats;
pub mod taxonomy;
pub mod timeline;

// Re-exports for convenience
pub use events::{Event, EventHandler, EventParser};
pub use fights::{Fight, FightRegistry};
pub use session::{ParseSession, ParseSettingsExt};
pub use stats::{Stat, StatError, StatGroup};
pub use taxonomy::{EventCode, EventGroup, Taxonomy, TaxonomyError};
pub use timeline::{SharedSettings, SharedTimeline, Timeline, TimelineState};
