use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use modular_bitfield::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Bit length of the elapsed-time field.
pub const BIT_LEN_TIME: u32 = 42;
/// Bit length of the per-tick sequence field.
pub const BIT_LEN_SEQUENCE: u32 = 13;
/// Bit length of the worker id field.
pub const BIT_LEN_WORKER_ID: u32 = 8;

pub const MAX_ELAPSED_TICKS: i64 = (1_i64 << BIT_LEN_TIME) - 1;
pub const MAX_SEQUENCE: u16 = (1_u16 << BIT_LEN_SEQUENCE) - 1;

/// A 63-bit identifier: `elapsed_ticks | sequence | worker_id`, MSB first.
///
/// Fields are declared least significant first, so the integer form is
/// `elapsed_ticks << 21 | sequence << 8 | worker_id`. The top bit is a
/// pad bit and stays zero, which keeps every id a non-negative `i64`.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id {
    /// 8 bits for the worker id (up to 256 workers).
    pub worker_id: B8,
    /// 13 bits for the sequence number (resets every tick).
    pub sequence: B13,
    /// 42 bits for 10ms ticks since the worker's start time.
    pub elapsed_ticks: B42,
    #[skip]
    __: B1,
}

impl Id {
    /// Returns the id as the packed integer.
    pub fn as_i64(&self) -> i64 {
        i64::from_le_bytes(self.into_bytes())
    }

    /// Encodes the 8-byte big-endian form with the standard base64 alphabet.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.as_i64().to_be_bytes())
    }

    pub fn decompose(&self) -> Decomposed {
        decompose(self.as_i64())
    }
}

impl From<Id> for i64 {
    fn from(id: Id) -> Self {
        id.as_i64()
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_i64().cmp(&other.as_i64())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Id")
            .field("elapsed_ticks", &self.elapsed_ticks())
            .field("sequence", &self.sequence())
            .field("worker_id", &self.worker_id())
            .finish()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// The parts of an id, keyed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decomposed {
    pub id: i64,
    pub elapsed_ticks: i64,
    pub sequence: u16,
    pub worker_id: u8,
}

/// Splits an integer into its id fields.
///
/// Any integer is accepted. Values that were never produced by a worker
/// decompose into well-defined but meaningless fields. The elapsed ticks
/// come from an arithmetic shift, so a negative input keeps its sign there.
pub fn decompose(id: i64) -> Decomposed {
    let parts = Id::from_bytes(id.to_le_bytes());
    Decomposed {
        id,
        elapsed_ticks: id >> (BIT_LEN_SEQUENCE + BIT_LEN_WORKER_ID),
        sequence: parts.sequence(),
        worker_id: parts.worker_id(),
    }
}
