//! Time sources

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{PoisonError, RwLock};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that stays at one instant until moved explicitly.
#[derive(Debug)]
pub struct FrozenClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FrozenClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.instant.write().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut instant = self.instant.write().unwrap_or_else(PoisonError::into_inner);
        *instant += by;
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read().unwrap_or_else(PoisonError::into_inner)
    }
}
