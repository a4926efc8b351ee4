use hal::Notifier;
use log::warn;

/// Stands in for the real notification channel by writing a log line
#[derive(Default)]
pub struct LogNotifier {
    sent: u64,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self) {
        self.sent += 1;
        warn!("Inactivity notification #{}", self.sent);
    }
}
