use crate::clock::AsyncClock;
use idworker::{
    clock::{tick_start, to_ticks},
    state::{Advance, WorkerState},
    Error, Id, IdWorkerSettings, SystemClock,
};
use jiff::Timestamp;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Async counterpart of [`idworker::IdWorker`].
///
/// Generates the same ids, but a sequence rollover suspends the calling
/// task instead of blocking its thread. The state lock is held across the
/// suspension, so other callers still wait for the next tick.
pub struct AsyncIdWorker<C: AsyncClock = SystemClock> {
    start_time: Timestamp,
    start_ticks: i64,
    worker_id: u8,
    clock: C,
    state: Mutex<WorkerState>,
}

impl AsyncIdWorker<SystemClock> {
    /// Creates a worker backed by the real system clock.
    pub fn new(settings: IdWorkerSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: AsyncClock> AsyncIdWorker<C> {
    /// Creates a worker that reads time from, and sleeps on, the given clock.
    pub fn with_clock(settings: IdWorkerSettings, clock: C) -> Result<Self, Error> {
        let start_time = settings.validate(clock.now())?;

        debug!(
            worker_id = settings.worker_id,
            start_time = %start_time,
            "created async id worker"
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

    /// Generates the next id, failing with [`Error::OverTime`] once the
    /// 42-bit time field is exhausted.
    pub async fn next_id(&self) -> Result<Id, Error> {
        let mut state = self.state.lock().await;

        let current = to_ticks(self.clock.now()) - self.start_ticks;
        if let Advance::Rollover { elapsed_ticks } = state.advance(current) {
            debug!(
                worker_id = self.worker_id,
                elapsed_ticks,
                "sequence exhausted, sleeping until next tick"
            );
            self.clock
                .sleep_until(tick_start(self.start_ticks + elapsed_ticks))
                .await;
        }

        let id = state.pack(self.worker_id);
        if let Err(err) = &id {
            error!(worker_id = self.worker_id, %err, "failed to generate id");
        }
        id
    }

    pub async fn next_i64(&self) -> Result<i64, Error> {
        self.next_id().await.map(|id| id.as_i64())
    }

    pub async fn next_base64(&self) -> Result<String, Error> {
        self.next_id().await.map(|id| id.to_base64())
    }
}
