// Time Provider Port (for testability)

use chrono::NaiveDateTime;

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current instant as naive UTC
    fn now(&self) -> NaiveDateTime;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}

pub mod mocks {
    use super::*;

    /// Clock frozen at a given instant
    pub struct FixedTimeProvider(pub NaiveDateTime);

    impl TimeProvider for FixedTimeProvider {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }
}
