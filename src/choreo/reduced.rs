//! Reduced-motion path: terminal styles applied directly, with no triggers or timelines.

use std::collections::BTreeSet;

use crate::{
    animation::value::{Property, StyleValue},
    choreo::composition::SequenceName,
    foundation::core::ElementId,
    scroll::sink::{MediaControl, StyleSink, WriteBatch, start_media},
};

/// Terminal values of a composition, as a flat write list.
#[derive(Debug)]
pub struct FinalState {
    sequence: SequenceName,
    writes: WriteBatch,
    media: Vec<ElementId>,
}

impl FinalState {
    pub fn new(sequence: SequenceName) -> Self {
        Self {
            sequence,
            writes: WriteBatch::new(),
            media: Vec::new(),
        }
    }

    /// Set `property` on `target`; a later set of the same pair wins.
    pub fn set(mut self, target: &ElementId, property: Property, value: StyleValue) -> Self {
        self.writes.push(target, property, value);
        self
    }

    /// Media to start muted when the state is applied.
    pub fn start_media(mut self, target: &ElementId) -> Self {
        if !self.media.contains(target) {
            self.media.push(target.clone());
        }
        self
    }

    pub fn sequence(&self) -> SequenceName {
        self.sequence
    }

    /// Every `(element, property)` this state sets.
    pub fn properties(&self) -> BTreeSet<(ElementId, Property)> {
        self.writes
            .writes()
            .iter()
            .map(|w| (w.target.clone(), w.property))
            .collect()
    }

    /// Value set for `(target, property)`.
    pub fn value(&self, target: &ElementId, property: Property) -> Option<&StyleValue> {
        self.writes
            .writes()
            .iter()
            .find(|w| &w.target == target && w.property == property)
            .map(|w| &w.value)
    }

    pub fn media(&self) -> &[ElementId] {
        &self.media
    }

    /// Queue every write into `batch` (for callers batching several states into one flush).
    pub fn queue(&self, batch: &mut WriteBatch) {
        batch.extend(self.writes.writes().iter().cloned());
    }
}

/// Apply `state` in one pass and start its media. Returns how many style writes landed.
#[tracing::instrument(skip_all, fields(sequence = %state.sequence()))]
pub fn apply_final_state(
    state: &FinalState,
    sink: &mut dyn StyleSink,
    media: &mut dyn MediaControl,
) -> usize {
    let mut batch = WriteBatch::new();
    state.queue(&mut batch);
    let applied = batch.flush(sink);
    for target in &state.media {
        start_media(media, target);
    }
    tracing::debug!(applied, "final state applied");
    applied
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/reduced.rs"]
mod tests;
