use std::sync::atomic::{AtomicBool, Ordering};

/// Holds an in-flight flag raised until dropped
pub(crate) struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    /// Returns None if the flag was already raised
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<InFlight<'a>> {
        match flag.swap(true, Ordering::AcqRel) {
            true => None,
            false => Some(InFlight(flag)),
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
