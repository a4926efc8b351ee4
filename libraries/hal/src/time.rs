/// Timing interfaces
use crate::types::Millis;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (usually power-on)
    fn now_ms(&self) -> Millis;
}

/// Blocking delay
pub trait Delay {
    /// Suspend the caller for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}
