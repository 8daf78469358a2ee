//! Time-deferred coalescing of values.
//!
//! A [`Debouncer`] holds at most one pending value and the time it becomes
//! due. Scheduling again replaces the value and pushes the deadline out, so
//! only the last value scheduled inside a quiet window is ever released.
//! Time is passed in explicitly (milliseconds on any monotonic clock), which
//! keeps the behaviour deterministic under test; the browser host drives it
//! from a timer.

#[cfg(test)]
#[path = "debounce_test.rs"]
mod debounce_test;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: f64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms: delay_ms.max(0.0), pending: None }
    }

    #[must_use]
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Replace any pending value with `value`, due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, value: T, now_ms: f64) {
        self.pending = Some(Pending { value, due_ms: now_ms + self.delay_ms });
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now_ms: f64) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms);
        if due { self.pending.take().map(|p| p.value) } else { None }
    }

    /// Release the pending value immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending value, if any.
    #[must_use]
    pub fn due_at(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.due_ms)
    }
}
