use std::time::{Duration, Instant};

/// Latest-call-wins coalescing for rapid input. Each submit replaces the
/// pending value and restarts the window; `poll` releases the value once
/// the window has passed with no newer submit. The search engine only ever
/// sees settled query strings.
#[derive(Debug)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn submit(&mut self, value: T) {
        self.submit_at(Instant::now(), value);
    }

    pub fn submit_at(&mut self, now: Instant, value: T) {
        self.pending = Some((now, value));
    }

    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((submitted, _)) if now.duration_since(*submitted) >= self.window => {
                self.pending.take().map(|(_, value)| value)
            }
            _ => None,
        }
    }

    /// Releases the pending value immediately, window or not.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
