//! Time-ordered 63-bit ids without central coordination.
//!
//! An id packs, most significant first, 42 bits of 10ms ticks since a start
//! time, a 13-bit per-tick sequence and an 8-bit worker id. Workers in a
//! fleet stay unique as long as the caller gives each a distinct worker id.

pub mod clock;
pub mod error;
pub mod id;
pub mod settings;
pub mod state;
mod worker;

pub use clock::{Clock, SystemClock};
pub use error::Error;
pub use id::{decompose, Decomposed, Id};
pub use settings::IdWorkerSettings;
pub use worker::IdWorker;
