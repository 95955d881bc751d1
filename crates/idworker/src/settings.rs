use crate::error::Error;
use jiff::Timestamp;
use serde::Deserialize;
use typed_builder::TypedBuilder;

/// Start time used when [`IdWorkerSettings::start_time`] is unset:
/// 2019-05-06T00:00:00Z.
pub const DEFAULT_START_TIME: Timestamp = Timestamp::constant(1_557_100_800, 0);

/// Configures an IdWorker instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TypedBuilder, Deserialize)]
pub struct IdWorkerSettings {
    /// Zero point of the 42-bit elapsed-time field. Must not be in the future.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub start_time: Option<Timestamp>,
    /// Identifies this worker in a fleet. Keeping it unique across running
    /// workers is up to the caller.
    #[builder(default)]
    #[serde(default)]
    pub worker_id: u8,
}

impl IdWorkerSettings {
    pub fn effective_start_time(&self) -> Timestamp {
        self.start_time.unwrap_or(DEFAULT_START_TIME)
    }

    /// Returns the start time to use, rejecting one that lies after `now`.
    pub fn validate(&self, now: Timestamp) -> Result<Timestamp, Error> {
        let start_time = self.effective_start_time();
        if start_time > now {
            return Err(Error::StartTimeAfterNow { start_time, now });
        }
        Ok(start_time)
    }
}
