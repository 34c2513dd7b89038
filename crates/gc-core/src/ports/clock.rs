/// Monotonic clock, in milliseconds since an arbitrary origin.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> u64;
}
