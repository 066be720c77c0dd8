//! Single-flight guard for the interactive controllers.
//!
//! Each controller allows one in-flight request; further submissions are
//! dropped, never queued. This is the server-side analog of disabling the
//! triggering control for the duration of the request.

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds the busy flag for one request; releases it on drop, so every exit
/// path (success, remote error, panic unwind) re-enables submission.
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Try to claim the flag. Returns `None` when a request is already in
    /// flight.
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let flag = AtomicBool::new(false);

        let guard = BusyGuard::acquire(&flag).unwrap();
        assert!(BusyGuard::acquire(&flag).is_none());

        drop(guard);
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
