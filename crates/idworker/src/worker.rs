use crate::{
    clock::{tick_start, to_ticks, Clock, SystemClock},
    error::Error,
    settings::IdWorkerSettings,
    state::{Advance, WorkerState},
    Id,
};
use jiff::Timestamp;
use std::sync::Mutex;
use tracing::{debug, error};

/// Snowflake-style ID generator with wait-on-overflow semantics.
///
/// Each id packs 10ms ticks since the start time, a per-tick sequence and
/// the worker id. Calls are serialized by one lock. When 8192 ids have been
/// handed out within one tick, the call moves on to the next tick and
/// blocks until it begins, stalling every other caller of this worker.
pub struct IdWorker<C: Clock = SystemClock> {
    start_time: Timestamp,
    start_ticks: i64,
    worker_id: u8,
    clock: C,
    state: Mutex<WorkerState>,
}

impl IdWorker<SystemClock> {
    /// Creates a worker backed by the real system clock.
    pub fn new(settings: IdWorkerSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> IdWorker<C> {
    /// Creates a worker that reads time from the given clock.
    pub fn with_clock(settings: IdWorkerSettings, clock: C) -> Result<Self, Error> {
        let start_time = settings.validate(clock.now())?;

        debug!(
            worker_id = settings.worker_id,
            start_time = %start_time,
            "created id worker"
        );

        Ok(Self {
            start_time,
            start_ticks: to_ticks(start_time),
            worker_id: settings.worker_id,
            clock,
            state: Mutex::new(WorkerState::default()),
        })
    }

    pub fn worker_id(&self) -> u8 {
        self.worker_id
    }

    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Generates the next id.
    ///
    /// Fails with [`Error::OverTime`] once more than 2^42 - 1 ticks have
    /// passed since the start time; every later call fails the same way.
    pub fn next_id(&self) -> Result<Id, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let current = to_ticks(self.clock.now()) - self.start_ticks;
        if let Advance::Rollover { elapsed_ticks } = state.advance(current) {
            debug!(
                worker_id = self.worker_id,
                elapsed_ticks,
                "sequence exhausted, waiting for next tick"
            );
            // The lock stays held so other callers queue behind the wait.
            self.clock
                .wait_until(tick_start(self.start_ticks + elapsed_ticks));
        }

        let id = state.pack(self.worker_id);
        if let Err(err) = &id {
            error!(worker_id = self.worker_id, %err, "failed to generate id");
        }
        id
    }

    pub fn next_i64(&self) -> Result<i64, Error> {
        self.next_id().map(|id| id.as_i64())
    }

    /// Generates the next id as base64 of its 8-byte big-endian form.
    pub fn next_base64(&self) -> Result<String, Error> {
        self.next_id().map(|id| id.to_base64())
    }
}
