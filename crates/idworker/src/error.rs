use jiff::Timestamp;
use thiserror::Error;

/// Errors returned by IdWorker construction and ID generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("start time is after current clock time: start_time={start_time}, now={now}")]
    StartTimeAfterNow { start_time: Timestamp, now: Timestamp },
    /// The 42-bit time field is exhausted. Every later call fails too;
    /// build a new worker with a later start time to recover.
    #[error("over the time limit: {elapsed_ticks} ticks elapsed since start time")]
    OverTime { elapsed_ticks: i64 },
    #[error("worker state lock is poisoned")]
    StatePoisoned,
}
