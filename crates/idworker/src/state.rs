use crate::{
    error::Error,
    id::{Id, MAX_ELAPSED_TICKS, MAX_SEQUENCE},
};

/// Outcome of [`WorkerState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The state is ready to be packed.
    Ready,
    /// The sequence wrapped within a tick. The state moved on to the next
    /// tick, and the caller must wait until `elapsed_ticks` (relative to the
    /// start time) begins before packing.
    Rollover { elapsed_ticks: i64 },
}

/// Mutable part of a worker: the last tick used and the sequence within it.
///
/// Both the blocking and the async worker drive this under their own lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerState {
    elapsed_ticks: i64,
    sequence: u16,
}

impl Default for WorkerState {
    /// Starts with a full sequence so the first call always opens a tick.
    fn default() -> Self {
        Self {
            elapsed_ticks: 0,
            sequence: MAX_SEQUENCE,
        }
    }
}

impl WorkerState {
    pub fn elapsed_ticks(&self) -> i64 {
        self.elapsed_ticks
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Moves the state to the tick `current` (ticks since the start time).
    pub fn advance(&mut self, current: i64) -> Advance {
        if current > self.elapsed_ticks {
            self.elapsed_ticks = current;
            self.sequence = 0;
            return Advance::Ready;
        }

        self.sequence = (self.sequence + 1) & MAX_SEQUENCE;
        if self.sequence != 0 {
            return Advance::Ready;
        }

        // Sequence exhausted: borrow the next tick.
        self.elapsed_ticks += 1;
        Advance::Rollover {
            elapsed_ticks: self.elapsed_ticks,
        }
    }

    /// Packs the state into an id, failing once the time field overflows.
    pub fn pack(&self, worker_id: u8) -> Result<Id, Error> {
        if self.elapsed_ticks > MAX_ELAPSED_TICKS {
            return Err(Error::OverTime {
                elapsed_ticks: self.elapsed_ticks,
            });
        }

        Ok(Id::new()
            .with_elapsed_ticks(self.elapsed_ticks as u64)
            .with_sequence(self.sequence)
            .with_worker_id(worker_id))
    }
}
