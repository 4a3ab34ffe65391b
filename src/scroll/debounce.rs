/// Coalesces bursts of resize events into one re-measurement after a quiet period.
///
/// Timestamps come from the frame clock; nothing here sleeps or spawns timers.
#[derive(Clone, Copy, Debug)]
pub struct ResizeDebouncer {
    quiet_ms: f64,
    last_event_ms: Option<f64>,
}

impl ResizeDebouncer {
    /// Debouncer firing `quiet_ms` after the last event.
    pub fn new(quiet_ms: f64) -> Self {
        Self {
            quiet_ms: quiet_ms.max(0.0),
            last_event_ms: None,
        }
    }

    /// Record a resize event.
    pub fn note(&mut self, now_ms: f64) {
        self.last_event_ms = Some(now_ms);
    }

    /// Whether a re-measurement is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.last_event_ms.is_some()
    }

    /// Returns `true` exactly once per burst, on the first poll after the quiet period.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.last_event_ms {
            Some(last) if now_ms - last >= self.quiet_ms => {
                self.last_event_ms = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending re-measurement.
    pub fn cancel(&mut self) {
        self.last_event_ms = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/debounce.rs"]
mod tests;
