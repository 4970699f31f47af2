pub mod event;
pub mod handler;
pub mod parser;
pub mod tally;

pub use event::Event;
pub use handler::{ChannelForwarder, EventHandler};
pub use parser::EventParser;
pub use tally::{EventTally, TallyHandler};
