use crate::{animation::ease::Ease, animation::value::Lerp};

/// Short wall-clock tween between two values, retargetable mid-flight.
///
/// Scroll-linked motion never uses this; it backs the sync controller's eased position
/// commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EasedTween<T> {
    from: T,
    to: T,
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
}

impl<T> EasedTween<T>
where
    T: Lerp + Copy,
{
    /// Start a tween at `start_ms`.
    pub fn new(from: T, to: T, start_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            ease,
        }
    }

    /// Destination value.
    pub fn target(&self) -> T {
        self.to
    }

    /// Normalized, un-eased progress at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Whether the tween has reached its destination at `now_ms`.
    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Value at `now_ms`.
    pub fn sample(&self, now_ms: f64) -> T {
        T::lerp(&self.from, &self.to, self.ease.apply(self.progress(now_ms)))
    }

    /// Restart from the current value toward `to`.
    pub fn retarget(&mut self, now_ms: f64, to: T, duration_ms: f64) {
        let cur = self.sample(now_ms);
        *self = Self::new(cur, to, now_ms, duration_ms, self.ease);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
