// src/pipeline/schedule.rs

//! Collection Scheduler: the long-lived background loop.
//!
//! One pass, then a fixed sleep, forever. The sleep after a completed pass
//! serialises passes without a lock; there is no persisted last-run state,
//! so a process restart simply begins a fresh pass immediately. Partial
//! prior-pass writes stay valid because every record commit is independent.

use std::time::Duration;

use crate::pipeline::Collector;

/// Scheduler states. The scheduler is either asleep between passes or
/// driving one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningPass,
}

/// Drives collection passes on a fixed interval.
pub struct Scheduler {
    collector: Collector,
    interval: Duration,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(collector: Collector, interval: Duration) -> Self {
        Self {
            collector,
            interval,
            state: SchedulerState::Idle,
        }
    }

    /// Convenience constructor for a day-denominated interval.
    pub fn with_interval_days(collector: Collector, days: u64) -> Self {
        Self::new(collector, Duration::from_secs(days * 24 * 60 * 60))
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run forever. Intended to be spawned once at process startup; a
    /// shutdown simply drops the task at its next await point.
    pub async fn run(mut self) {
        loop {
            self.state = SchedulerState::RunningPass;
            log::info!("starting exam board collection pass");

            let stats = self.collector.collect_all().await;

            log::info!(
                "pass complete in {}s: {} stored, {} skipped, {} stage failures; next run in {}s",
                (stats.finished - stats.started).num_seconds(),
                stats.stored(),
                stats.skipped(),
                stats.failures(),
                self.interval.as_secs()
            );

            self.state = SchedulerState::Idle;
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Config;
    use crate::registry::BoardRegistry;
    use crate::store::ExamStore;

    #[test]
    fn starts_idle_with_weekly_interval() {
        let config = Config::default();
        let store = ExamStore::open_in_memory().unwrap();
        let collector = Collector::new(&config, BoardRegistry::empty(), store).unwrap();
        let scheduler = Scheduler::with_interval_days(collector, config.schedule.interval_days);

        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.interval, Duration::from_secs(7 * 24 * 60 * 60));
    }
}
