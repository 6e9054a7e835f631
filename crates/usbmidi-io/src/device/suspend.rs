//! Suspend flag with a timed, wakeable wait.

use parking_lot::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub(crate) struct SuspendGate {
    suspended: Mutex<bool>,
    signal: Condvar,
}

impl SuspendGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suspend(&self) {
        *self.suspended.lock() = true;
    }

    pub fn resume(&self) {
        let mut suspended = self.suspended.lock();
        *suspended = false;
        self.signal.notify_all();
    }

    /// Wakes a waiting poll thread without changing the flag.
    pub fn wake(&self) {
        let _guard = self.suspended.lock();
        self.signal.notify_all();
    }

    pub fn is_suspended(&self) -> bool {
        *self.suspended.lock()
    }

    /// Waits up to `timeout` regardless of the flag. `resume()` and `wake()` end it early.
    pub fn pause(&self, timeout: Duration) {
        let mut suspended = self.suspended.lock();
        let _ = self.signal.wait_for(&mut suspended, timeout);
    }

    /// Returns `false` immediately when active. When suspended, waits up to `timeout`
    /// (or until woken) and returns `true`; the caller re-checks its flags either way.
    pub fn wait_if_suspended(&self, timeout: Duration) -> bool {
        let mut suspended = self.suspended.lock();
        if !*suspended {
            return false;
        }
        // Timeouts and spurious wakeups are equivalent here.
        let _ = self.signal.wait_for(&mut suspended, timeout);
        true
    }
}
