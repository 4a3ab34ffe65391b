use std::collections::{BTreeMap, BTreeSet, HashMap};

use smallvec::SmallVec;

use crate::{
    animation::value::{Property, PropertyWrite, StyleValue, StyleWrite},
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
};

/// Write-only style application.
///
/// Each call is idempotent: applying the same writes twice leaves the same style.
pub trait StyleSink {
    /// Apply `writes` to `target`.
    ///
    /// Returns [`ScrollweaveError::Detached`] when `target` is no longer rendered.
    fn apply(&mut self, target: &ElementId, writes: &[StyleWrite]) -> ScrollweaveResult<()>;
}

/// Background media control.
pub trait MediaControl {
    /// Start `target` muted. The runtime may refuse (autoplay policy).
    fn play_muted(&mut self, target: &ElementId) -> ScrollweaveResult<()>;
}

/// Start media muted, swallowing autoplay rejection.
///
/// A rejected start leaves the element ready for a later gesture-driven retry.
pub fn start_media(media: &mut dyn MediaControl, target: &ElementId) -> bool {
    match media.play_muted(target) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(element = %target, error = %e, "media start refused");
            false
        }
    }
}

/// Per-frame write buffer.
///
/// Writes are de-duplicated per `(target, property)` with the last write winning, then flushed
/// grouped by target in first-touch order.
#[derive(Debug, Default)]
pub struct WriteBatch {
    writes: Vec<PropertyWrite>,
    idx_by_key: HashMap<(ElementId, Property), usize>,
}

impl WriteBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one write.
    pub fn push(&mut self, target: &ElementId, property: Property, value: StyleValue) {
        let key = (target.clone(), property);
        match self.idx_by_key.get(&key) {
            Some(&i) => self.writes[i].value = value,
            None => {
                self.idx_by_key.insert(key, self.writes.len());
                self.writes.push(PropertyWrite {
                    target: target.clone(),
                    property,
                    value,
                });
            }
        }
    }

    /// Queue timeline output.
    pub fn extend(&mut self, writes: impl IntoIterator<Item = PropertyWrite>) {
        for w in writes {
            self.push(&w.target, w.property, w.value);
        }
    }

    /// Number of queued writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Queued writes in order.
    pub fn writes(&self) -> &[PropertyWrite] {
        &self.writes
    }

    /// Apply everything to `sink` and clear the batch. Returns how many writes landed.
    ///
    /// Writes to detached elements are dropped silently.
    pub fn flush(&mut self, sink: &mut dyn StyleSink) -> usize {
        let mut order: Vec<ElementId> = Vec::new();
        let mut grouped: HashMap<ElementId, SmallVec<[StyleWrite; 8]>> = HashMap::new();
        for w in self.writes.drain(..) {
            let group = grouped.entry(w.target.clone()).or_insert_with(|| {
                order.push(w.target.clone());
                SmallVec::new()
            });
            group.push(StyleWrite::new(w.property, w.value));
        }
        self.idx_by_key.clear();

        let mut applied = 0;
        for target in order {
            let Some(group) = grouped.remove(&target) else {
                continue;
            };
            match sink.apply(&target, &group) {
                Ok(()) => applied += group.len(),
                Err(ScrollweaveError::Detached(_)) => {
                    tracing::debug!(element = %target, "dropping writes to detached element");
                }
                Err(e) => {
                    tracing::warn!(element = %target, error = %e, "style sink rejected writes");
                }
            }
        }
        applied
    }
}

/// Recording sink holding the resulting style table.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStyleSink {
    styles: BTreeMap<ElementId, BTreeMap<Property, StyleValue>>,
    log: Vec<PropertyWrite>,
    detached: BTreeSet<ElementId>,
}

impl InMemoryStyleSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `property` on `target`.
    pub fn get(&self, target: &ElementId, property: Property) -> Option<&StyleValue> {
        self.styles.get(target)?.get(&property)
    }

    /// Numeric value of `property` on `target`.
    pub fn get_f64(&self, target: &ElementId, property: Property) -> Option<f64> {
        self.get(target, property)?.as_f64()
    }

    /// Whole style table.
    pub fn styles(&self) -> &BTreeMap<ElementId, BTreeMap<Property, StyleValue>> {
        &self.styles
    }

    /// Every applied write, in order.
    pub fn log(&self) -> &[PropertyWrite] {
        &self.log
    }

    /// Forget the write log (the style table is kept).
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Make further writes to `target` fail as detached.
    pub fn detach(&mut self, target: &ElementId) {
        self.detached.insert(target.clone());
    }
}

impl StyleSink for InMemoryStyleSink {
    fn apply(&mut self, target: &ElementId, writes: &[StyleWrite]) -> ScrollweaveResult<()> {
        if self.detached.contains(target) {
            return Err(ScrollweaveError::detached(target.to_string()));
        }
        let entry = self.styles.entry(target.clone()).or_default();
        for w in writes {
            entry.insert(w.property, w.value.clone());
            self.log.push(PropertyWrite {
                target: target.clone(),
                property: w.property,
                value: w.value.clone(),
            });
        }
        Ok(())
    }
}

/// Recording media controller.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMedia {
    /// Elements whose playback was started.
    pub started: Vec<ElementId>,
    /// Every attempt, including refused ones.
    pub attempts: Vec<ElementId>,
    /// Refuse every start, like a browser blocking autoplay.
    pub reject_autoplay: bool,
}

impl InMemoryMedia {
    /// Controller that accepts every start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller that refuses every start.
    pub fn rejecting() -> Self {
        Self {
            reject_autoplay: true,
            ..Self::default()
        }
    }
}

impl MediaControl for InMemoryMedia {
    fn play_muted(&mut self, target: &ElementId) -> ScrollweaveResult<()> {
        self.attempts.push(target.clone());
        if self.reject_autoplay {
            return Err(ScrollweaveError::media(format!(
                "autoplay rejected for '{target}'"
            )));
        }
        if !self.started.contains(target) {
            self.started.push(target.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/sink.rs"]
mod tests;
