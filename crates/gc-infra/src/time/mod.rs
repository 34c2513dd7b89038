mod fail_safe_timer;
mod manual_clock;
mod system_clock;

pub use fail_safe_timer::TokioFailSafeTimer;
pub use manual_clock::ManualClock;
pub use system_clock::MonotonicClock;
