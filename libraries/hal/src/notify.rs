/// Notification sink interface

/// Receives inactivity notifications
///
/// Delivery is up to the implementation; the caller never observes failures.
pub trait Notifier {
    fn notify(&mut self);
}

impl<F: FnMut()> Notifier for F {
    fn notify(&mut self) {
        self()
    }
}
