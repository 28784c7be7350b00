//! Superseding timers.
//!
//! A [`Debouncer`] holds at most one pending value. Scheduling a new value
//! replaces (and so cancels) the previous one and restarts the delay; the
//! value is released once the delay has elapsed with no newer schedule.
//! Time is passed in as milliseconds since an arbitrary epoch so the event
//! loop and tests can drive it without sleeping.

/// Cancellable, superseding delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Schedule `value`, superseding anything still pending.
    pub fn schedule(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    /// Release the pending value if its delay has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Milliseconds until the pending value is due, `None` when idle.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        let (_, queued_at) = self.pending.as_ref()?;
        Some(
            self.delay_ms
                .saturating_sub(now_ms.saturating_sub(*queued_at)),
        )
    }
}
