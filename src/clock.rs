//! Wall-clock abstraction.
//!
//! `store`'s pre-step and `fetch_span`'s leading `clean` call both need a
//! wall-clock reading that is independent of whatever `now` the caller passes
//! as a query parameter. Injecting it as a trait lets tests drive the ring
//! with a deterministic fake clock instead of racing real time.

use std::time::{SystemTime, UNIX_EPOCH};

pub trait Clock: Send + Sync {
    /// The current tick. Unit-agnostic; microseconds in practice.
    fn now(&self) -> i64;
}

/// Reads microseconds since the Unix epoch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0)
    }
}
