//! Pipeline entry points for collection operations.
//!
//! - `Collector`: one full pass over all boards and kinds
//! - `Scheduler`: the long-lived fixed-interval background loop

pub mod collect;
pub mod schedule;

pub use collect::{Collector, KindOutcome, PassStats, StageResult};
pub use schedule::{Scheduler, SchedulerState};
