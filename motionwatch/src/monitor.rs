use hal::{Clock, Delay, ImuEvent, ImuSensor, Millis, Notifier};
use log::{debug, error, info, trace};
use motion::{MotionConfig, MotionReading, MotionTracker};

use crate::{Board, MonitorError, Resources};

/// Interval at which a halted monitor wakes up to do nothing
pub const HALT_POLL_MS: u32 = 10;

/// Wait forever. Used when the sensor cannot be brought up; there is no
/// retry and no way out.
pub fn halt(delay: &mut dyn Delay) -> ! {
    error!("Monitor halted");
    loop {
        delay.delay_ms(HALT_POLL_MS);
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    pub polls: u64,
    pub motion_events: u64,
    pub notifications: u64,
}

/// What a single poll observed
#[derive(Debug, Clone, Copy)]
pub struct PollOutcome {
    pub now_ms: Millis,
    pub event: ImuEvent,
    pub reading: MotionReading,
    /// The idle timeout elapsed and the notifier was called
    pub notified: bool,
}

/// Polls an IMU and calls a notifier after a period without motion
pub struct Monitor {
    imu: Box<dyn ImuSensor>,
    clock: Box<dyn Clock>,
    delay: Box<dyn Delay>,
    notifier: Box<dyn Notifier>,
    tracker: MotionTracker,
    stats: MonitorStats,
}

impl Monitor {
    /// Bring up the board's IMU, halting forever if that fails.
    pub fn start(board: impl Board, config: MotionConfig, notifier: Box<dyn Notifier>) -> Self {
        info!("Board: {}", board.name());
        match Self::init(board.split_resources(), config, notifier) {
            Ok(monitor) => monitor,
            Err((err, mut delay)) => {
                error!("{}", err);
                halt(delay.as_mut())
            }
        }
    }

    /// Validate the configuration and initialize the IMU. On success the
    /// idle timer starts at the current clock reading.
    pub fn setup(
        resources: Resources,
        config: MotionConfig,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, MonitorError> {
        Self::init(resources, config, notifier).map_err(|(err, _)| err)
    }

    fn init(
        resources: Resources,
        config: MotionConfig,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self, (MonitorError, Box<dyn Delay>)> {
        let Resources { imu, clock, delay } = resources;

        if let Err(err) = config.validate() {
            return Err((err.into(), delay));
        }

        let mut imu = match imu {
            Some(imu) => imu,
            None => return Err((MonitorError::MissingImu, delay)),
        };

        if !imu.init() {
            let sensor = imu.name().to_string();
            return Err((MonitorError::SensorInit { sensor }, delay));
        }

        let now = clock.now_ms();
        info!(
            "{} ready: threshold {} m/s², idle timeout {} ms, sample period {} ms",
            imu.name(),
            config.motion_threshold,
            config.idle_timeout_ms,
            config.sample_period_ms
        );

        Ok(Self {
            imu,
            clock,
            delay,
            notifier,
            tracker: MotionTracker::new(config, now),
            stats: MonitorStats::default(),
        })
    }

    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Read one sample, update the tracker and notify on timeout.
    pub fn poll(&mut self) -> PollOutcome {
        let event = self.imu.get_event();
        let now_ms = self.clock.now_ms();
        trace!(
            "gyro ({:.3}, {:.3}, {:.3}) rad/s, {:.1} °C",
            event.gyro.x,
            event.gyro.y,
            event.gyro.z,
            event.temperature
        );

        let update = self.tracker.update(&event.acceleration, now_ms);
        self.stats.polls += 1;
        if update.reading.is_moving() {
            self.stats.motion_events += 1;
        }

        let notified = update.idle.timed_out();
        if notified {
            info!("No motion for {} ms, sending notification", self.tracker.config().idle_timeout_ms);
            self.notifier.notify();
            self.stats.notifications += 1;
        }

        PollOutcome {
            now_ms,
            event,
            reading: update.reading,
            notified,
        }
    }

    fn sleep(&mut self) {
        let period = self.tracker.config().sample_period_ms;
        self.delay.delay_ms(period);
    }

    /// Poll forever at the configured sample period
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
            self.sleep();
        }
    }

    /// Poll `iterations` times, sleeping the sample period after each poll
    pub fn run_for(&mut self, iterations: u64) -> MonitorStats {
        for _ in 0..iterations {
            self.poll();
            self.sleep();
        }
        debug!("stopped after {} polls: {:?}", iterations, self.stats);
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::Vector3d;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeClock(Rc<Cell<u32>>);

    impl FakeClock {
        fn at(ms: u32) -> Self {
            Self(Rc::new(Cell::new(ms)))
        }

        fn advance(&self, ms: u32) {
            self.0.set(self.0.get().wrapping_add(ms));
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> Millis {
            self.0.get()
        }
    }

    /// Delay that moves the fake clock forward instead of sleeping
    struct FakeDelay(FakeClock);

    impl Delay for FakeDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0.advance(ms);
        }
    }

    #[derive(Clone, Default)]
    struct Counters {
        init_calls: Rc<Cell<u32>>,
        reads: Rc<Cell<u32>>,
        notifications: Rc<Cell<u32>>,
    }

    /// Plays back queued samples, then stays at rest
    struct ScriptedImu {
        responds: bool,
        samples: VecDeque<Vector3d>,
        counters: Counters,
    }

    impl ImuSensor for ScriptedImu {
        fn init(&mut self) -> bool {
            self.counters.init_calls.set(self.counters.init_calls.get() + 1);
            self.responds
        }

        fn get_acceleration(&mut self) -> Vector3d {
            self.counters.reads.set(self.counters.reads.get() + 1);
            self.samples
                .pop_front()
                .unwrap_or_else(|| Vector3d::new(0.0, 0.0, 9.81))
        }

        fn get_gyro(&mut self) -> Vector3d {
            Vector3d::new(0.01, 0.0, -0.01)
        }

        fn get_temperature(&mut self) -> f32 {
            24.5
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct Harness {
        clock: FakeClock,
        counters: Counters,
    }

    impl Harness {
        fn new(start_ms: u32) -> Self {
            Self {
                clock: FakeClock::at(start_ms),
                counters: Counters::default(),
            }
        }

        fn resources(&self, responds: bool, samples: Vec<Vector3d>) -> Resources {
            Resources {
                imu: Some(Box::new(ScriptedImu {
                    responds,
                    samples: samples.into(),
                    counters: self.counters.clone(),
                })),
                clock: Box::new(self.clock.clone()),
                delay: Box::new(FakeDelay(self.clock.clone())),
            }
        }

        fn notifier(&self) -> Box<dyn Notifier> {
            let count = self.counters.notifications.clone();
            Box::new(move || count.set(count.get() + 1))
        }

        fn monitor(&self, samples: Vec<Vector3d>) -> Monitor {
            Monitor::setup(self.resources(true, samples), config(), self.notifier())
                .expect("setup should succeed")
        }
    }

    fn config() -> MotionConfig {
        MotionConfig::default()
            .with_motion_threshold(0.1)
            .with_idle_timeout_ms(10_000)
            .with_sample_period_ms(500)
    }

    #[test]
    fn test_setup_starts_timer_at_current_time() {
        let harness = Harness::new(1_000);
        let monitor = harness.monitor(vec![]);
        assert_eq!(monitor.tracker().last_motion_ms(), 1_000);
        assert_eq!(harness.counters.init_calls.get(), 1);
        assert_eq!(monitor.stats(), MonitorStats::default());
    }

    #[test]
    fn test_init_failure_polls_nothing() {
        let harness = Harness::new(0);
        let result = Monitor::setup(harness.resources(false, vec![]), config(), harness.notifier());

        match result {
            Err(MonitorError::SensorInit { sensor }) => assert_eq!(sensor, "scripted"),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("setup should fail"),
        }
        assert_eq!(harness.counters.reads.get(), 0);
        assert_eq!(harness.counters.notifications.get(), 0);
    }

    #[test]
    fn test_missing_imu() {
        let harness = Harness::new(0);
        let mut resources = harness.resources(true, vec![]);
        resources.imu = None;
        let result = Monitor::setup(resources, config(), harness.notifier());
        assert!(matches!(result, Err(MonitorError::MissingImu)));
    }

    #[test]
    fn test_invalid_config_rejected_before_init() {
        let harness = Harness::new(0);
        let result = Monitor::setup(
            harness.resources(true, vec![]),
            config().with_idle_timeout_ms(0),
            harness.notifier(),
        );
        assert!(matches!(result, Err(MonitorError::Config(_))));
        assert_eq!(harness.counters.init_calls.get(), 0);
    }

    #[test]
    fn test_stationary_notifies_once_per_window() {
        let harness = Harness::new(0);
        let mut monitor = harness.monitor(vec![]);

        // Polls at 0, 500, ..., 35_000 ms
        let stats = monitor.run_for(71);

        assert_eq!(stats.polls, 71);
        assert_eq!(stats.motion_events, 0);
        assert_eq!(stats.notifications, 3);
        assert_eq!(harness.counters.notifications.get(), 3);
        assert_eq!(harness.clock.now_ms(), 35_500);
    }

    #[test]
    fn test_motion_defers_notification() {
        let harness = Harness::new(0);
        let mut samples = vec![Vector3d::new(0.0, 0.0, 9.81); 16];
        samples.push(Vector3d::new(9.9, 0.3, 9.81));
        let mut monitor = harness.monitor(samples);

        let mut notified_at = Vec::new();
        for _ in 0..60 {
            let outcome = monitor.poll();
            if outcome.reading.is_moving() {
                assert_eq!(outcome.now_ms, 8_000);
                assert!((outcome.reading.net - 4.13).abs() < 0.01);
            }
            if outcome.notified {
                notified_at.push(outcome.now_ms);
            }
            harness.clock.advance(500);
        }

        // Shake at 8_000 ms pushes the first timeout past 18_000 ms
        assert_eq!(notified_at, vec![18_500, 29_000]);
        assert_eq!(monitor.stats().motion_events, 1);
    }

    #[test]
    fn test_poll_reports_full_event() {
        let harness = Harness::new(0);
        let mut monitor = harness.monitor(vec![Vector3d::new(9.81, 0.0, 0.0)]);

        let outcome = monitor.poll();
        assert_eq!(outcome.event.acceleration, Vector3d::new(9.81, 0.0, 0.0));
        assert_eq!(outcome.event.gyro, Vector3d::new(0.01, 0.0, -0.01));
        assert_eq!(outcome.event.temperature, 24.5);
        assert!(!outcome.reading.is_moving());
        assert!(!outcome.notified);
    }

    #[test]
    fn test_clock_rollover_during_run() {
        let harness = Harness::new(u32::MAX - 3_000);
        let mut monitor = harness.monitor(vec![]);

        // 20 polls span 9_500 ms across the wrap
        let stats = monitor.run_for(20);
        assert_eq!(stats.notifications, 0);

        let stats = monitor.run_for(2);
        assert_eq!(stats.notifications, 1);
    }

    struct FakeBoard(Resources);

    impl Board for FakeBoard {
        fn name(&self) -> &str {
            "fake"
        }

        fn split_resources(self) -> Resources {
            self.0
        }
    }

    #[test]
    fn test_start_with_working_board() {
        let harness = Harness::new(250);
        let board = FakeBoard(harness.resources(true, vec![]));
        let mut monitor = Monitor::start(board, config(), harness.notifier());

        assert_eq!(monitor.tracker().last_motion_ms(), 250);
        assert_eq!(monitor.run_for(3).polls, 3);
    }

    /// Records every wait and panics once `limit` waits have been made, so a
    /// loop that never returns can be stopped from a test
    struct CountedDelay {
        waits: Rc<RefCell<Vec<u32>>>,
        limit: usize,
    }

    impl Delay for CountedDelay {
        fn delay_ms(&mut self, ms: u32) {
            let mut waits = self.waits.borrow_mut();
            waits.push(ms);
            if waits.len() >= self.limit {
                panic!("delay limit reached");
            }
        }
    }

    #[test]
    fn test_start_with_dead_sensor_halts() {
        let harness = Harness::new(0);
        let waits = Rc::new(RefCell::new(Vec::new()));
        let mut resources = harness.resources(false, vec![]);
        resources.delay = Box::new(CountedDelay {
            waits: waits.clone(),
            limit: 25,
        });
        let board = FakeBoard(resources);

        let result = catch_unwind(AssertUnwindSafe(|| {
            Monitor::start(board, config(), harness.notifier())
        }));

        // Only the delay limit gets out of the halt loop
        assert!(result.is_err());
        assert_eq!(harness.counters.init_calls.get(), 1);
        assert_eq!(harness.counters.reads.get(), 0);
        assert_eq!(harness.counters.notifications.get(), 0);

        let waits = waits.borrow();
        assert_eq!(waits.len(), 25);
        assert!(waits.iter().all(|&ms| ms == HALT_POLL_MS));
    }
}
