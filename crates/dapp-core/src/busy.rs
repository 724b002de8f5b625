//! In-flight flag shared by the panels.
//!
//! A panel raises its flag before awaiting the wallet and a [`BusyGuard`]
//! lowers it again on drop, so a cancelled operation never leaves the panel
//! stuck in `Busy`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::DappError;

/// Panel state carrying an in-flight flag.
pub(crate) trait InFlight {
    fn in_flight(&mut self) -> &mut bool;
}

/// Locks panel state. The lock is never held across an await and the state
/// stays consistent if a holder panicked, so poisoning is ignored.
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) struct BusyGuard<'a, T: InFlight> {
    state: &'a Mutex<T>,
}

impl<'a, T: InFlight> BusyGuard<'a, T> {
    /// Raise the flag and run `reset` under the same lock. Fails with
    /// [`DappError::Busy`], leaving the state untouched, if it is already up.
    pub(crate) fn acquire(
        state: &'a Mutex<T>,
        reset: impl FnOnce(&mut T),
    ) -> Result<Self, DappError> {
        let mut locked = lock(state);
        let flag = locked.in_flight();
        if *flag {
            return Err(DappError::Busy);
        }
        *flag = true;
        reset(&mut locked);
        Ok(Self { state })
    }

    /// Lower the flag and record the outcome in one critical section.
    pub(crate) fn finish<R>(self, record: impl FnOnce(&mut T) -> R) -> R {
        let mut locked = lock(self.state);
        *locked.in_flight() = false;
        record(&mut locked)
    }
}

impl<T: InFlight> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        *lock(self.state).in_flight() = false;
    }
}
