//! Named numeric accumulators
//!
//! - **Stat**: a stored running total or a per-second rate derived from one on read
//! - **StatGroup**: named stats plus named child groups (party members, monsters)
//! - **sets**: the fixed stat layouts seeded into overall and entity groups

mod group;
pub mod sets;
mod stat;

pub use group::{StatGroup, StatGroupSnapshot, StatValue};
pub use stat::{PerSecondAverageStat, Stat, TotalStat};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatError {
    #[error("stat {stat:?} derives from {source_name:?}, which is not a total in this group")]
    MissingSource { stat: String, source_name: String },
    #[error("no stat named {0:?}")]
    UnknownStat(String),
    #[error("stat {0:?} is derived and cannot be applied to")]
    NotATotal(String),
}
