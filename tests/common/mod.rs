use std::sync::atomic::{AtomicI64, Ordering};

use gts_chunk_store::{Clock, Elevation, Location, Value};

/// A `Clock` whose reading is set explicitly, so tests can drive `store` and
/// `fetch_span`'s leading `clean` deterministically instead of racing real
/// time.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: AtomicI64,
}

impl FakeClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::Relaxed);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }
}

pub fn loc(n: u64) -> Location {
    Location(n)
}

pub fn elev(n: i64) -> Elevation {
    Elevation(n)
}

pub fn val(n: i64) -> Value {
    Value::Long(n)
}
