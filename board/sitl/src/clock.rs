use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use hal::{Clock, Delay, Millis};

/// Wall clock in milliseconds since the clock was created
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        // Truncation wraps like a 32-bit hardware millisecond counter
        self.epoch.elapsed().as_millis() as u32
    }
}

pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Simulated time that only moves when something waits on it
#[derive(Clone, Default)]
pub struct VirtualClock(Rc<Cell<Millis>>);

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }

    pub fn delay(&self) -> VirtualDelay {
        VirtualDelay(self.clone())
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> Millis {
        self.0.get()
    }
}

/// Advances a `VirtualClock` instead of sleeping
pub struct VirtualDelay(VirtualClock);

impl Delay for VirtualDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.advance(ms);
    }
}
