use std::sync::atomic::{AtomicBool, Ordering};

use gc_core::ports::CommissioningWindowPort;
use tracing::info;

/// Commissioning window state held in a flag.
#[derive(Debug, Default)]
pub struct CommissioningWindowFlag {
    open: AtomicBool,
}

impl CommissioningWindowFlag {
    pub fn new(open: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
        }
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        info!("commissioning window opened");
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        info!("commissioning window closed");
    }
}

impl CommissioningWindowPort for CommissioningWindowFlag {
    fn is_commissioning_window_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}
