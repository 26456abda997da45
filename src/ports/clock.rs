use chrono::{DateTime, Utc};

/// Source of "now" for splitting shows into past and upcoming.
///
/// Production code uses [`SystemClock`]; tests freeze time with the generated mock.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
