use std::sync::atomic::{AtomicU64, Ordering};

/// Commissioning progress checkpoint surfaced to the commissioner.
///
/// Set by every successful commissioning step, reset to 0 on fail-safe
/// expiry, on completion and at startup.
#[derive(Debug, Default)]
pub struct Breadcrumb(AtomicU64);

impl Breadcrumb {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: u64) {
        self.0.store(value, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.set(0);
    }
}
