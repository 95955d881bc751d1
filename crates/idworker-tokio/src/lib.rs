//! Tokio front-end for [`idworker`].

mod clock;
mod worker;

pub use clock::AsyncClock;
pub use worker::AsyncIdWorker;
