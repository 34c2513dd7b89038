/// Whether a commissioning window is currently advertised.
pub trait CommissioningWindowPort: Send + Sync {
    fn is_commissioning_window_open(&self) -> bool;
}
