use chrono::{DateTime, Utc};

/// Time source threaded through the factory, orchestrator and query
/// service so tests can pin instants instead of racing the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used at runtime.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
