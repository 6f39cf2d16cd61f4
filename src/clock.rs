//! Wall-clock access

use jiff::Timestamp;

/// Source of the current instant
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Timestamp;
}

/// Local system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
pub use self::fake::FakeClock;

#[cfg(test)]
mod fake {
    use super::Clock;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::{Arc, Mutex};

    /// Clock that only moves when told to
    #[derive(Debug, Clone)]
    pub struct FakeClock {
        current: Arc<Mutex<Timestamp>>,
    }

    impl FakeClock {
        pub fn new(now: Timestamp) -> Self {
            Self {
                current: Arc::new(Mutex::new(now)),
            }
        }

        pub fn advance(&self, by: SignedDuration) {
            let mut current = self.current.lock().unwrap();
            *current = current.checked_add(by).unwrap();
        }

        pub fn set(&self, now: Timestamp) {
            *self.current.lock().unwrap() = now;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Timestamp {
            *self.current.lock().unwrap()
        }
    }
}
