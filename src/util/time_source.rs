use tokio::time::Instant;

#[cfg(test)]
pub use manual::ManualTimeSource;

/// Clock used for dead reckoning
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Instant;
}

/// Reads tokio's clock, which follows the wall clock unless paused in tests.
/// Timed moves schedule their stop on the same clock.
#[derive(Debug, Default, Copy, Clone)]
pub struct TokioTimeSource;

impl TimeSource for TokioTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(test)]
mod manual {
    use super::TimeSource;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::time::Duration;
    use tokio::time::Instant;

    /// A clock that only moves when told to
    #[derive(Debug, Clone)]
    pub struct ManualTimeSource(Arc<Mutex<Instant>>);

    impl ManualTimeSource {
        pub fn new() -> Self {
            Self(Arc::new(Mutex::new(Instant::now())))
        }

        pub fn advance(&self, by: Duration) {
            *self.0.lock().unwrap_or_else(PoisonError::into_inner) += by;
        }
    }

    impl TimeSource for ManualTimeSource {
        fn now(&self) -> Instant {
            *self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
