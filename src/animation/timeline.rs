use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::{
    animation::ease::Ease,
    animation::value::{Lerp, Property, PropertyWrite, StyleValue},
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
};

const START_EPSILON: f64 = 1e-9;

/// Where a segment or label sits on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TimeOffset {
    /// Seconds from timeline start.
    At(f64),
    /// Relative to a previously declared label.
    Label {
        /// Label name.
        name: String,
        /// Seconds added to the label position (may be negative).
        delta: f64,
    },
    /// Relative to the end of the previously declared segment (timeline start if none).
    AfterPrevious(f64),
    /// Relative to the start of the previously declared segment (timeline start if none).
    WithPrevious(f64),
}

impl TimeOffset {
    /// Exactly at a label.
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label {
            name: name.into(),
            delta: 0.0,
        }
    }

    /// At a label, shifted by `delta` seconds.
    pub fn label_plus(name: impl Into<String>, delta: f64) -> Self {
        Self::Label {
            name: name.into(),
            delta,
        }
    }
}

impl Default for TimeOffset {
    fn default() -> Self {
        Self::AfterPrevious(0.0)
    }
}

/// Per-property tween inside a segment.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyTween {
    /// Explicit start value; `None` continues from whatever the track held before.
    pub from: Option<StyleValue>,
    /// End value.
    pub to: StyleValue,
    /// Curve override; falls back to the segment ease.
    pub ease: Option<Ease>,
}

/// Declarative segment, before label resolution.
#[derive(Clone, Debug)]
pub struct SegmentDef {
    target: ElementId,
    properties: BTreeMap<Property, PropertyTween>,
    offset: TimeOffset,
    duration: f64,
    ease: Ease,
}

impl SegmentDef {
    /// Start a segment on `target` lasting `duration` seconds.
    pub fn new(target: ElementId, duration: f64) -> Self {
        Self {
            target,
            properties: BTreeMap::new(),
            offset: TimeOffset::default(),
            duration,
            ease: Ease::default(),
        }
    }

    /// Zero-duration segment (an instantaneous set).
    pub fn set(target: ElementId) -> Self {
        Self::new(target, 0.0)
    }

    /// Tween `property` from its current track value to `to`.
    pub fn to(mut self, property: Property, to: StyleValue) -> Self {
        self.properties.insert(
            property,
            PropertyTween {
                from: None,
                to,
                ease: None,
            },
        );
        self
    }

    /// Tween `property` between explicit values.
    pub fn from_to(mut self, property: Property, from: StyleValue, to: StyleValue) -> Self {
        self.properties.insert(
            property,
            PropertyTween {
                from: Some(from),
                to,
                ease: None,
            },
        );
        self
    }

    /// Tween `property` with its own curve.
    pub fn to_eased(mut self, property: Property, to: StyleValue, ease: Ease) -> Self {
        self.properties.insert(
            property,
            PropertyTween {
                from: None,
                to,
                ease: Some(ease),
            },
        );
        self
    }

    /// Default curve for properties without an override.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Position on the timeline.
    pub fn at(mut self, offset: TimeOffset) -> Self {
        self.offset = offset;
        self
    }
}

enum Entry {
    Label { name: String, offset: TimeOffset },
    Segment(SegmentDef),
}

/// Builds a [`Timeline`], resolving labels in declaration order.
pub struct TimelineBuilder {
    name: String,
    entries: Vec<Entry>,
    base: HashMap<(ElementId, Property), StyleValue>,
}

impl TimelineBuilder {
    /// Start an empty timeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            base: HashMap::new(),
        }
    }

    /// Record the value `property` holds on `target` before the timeline touches it.
    pub fn base(mut self, target: &ElementId, property: Property, value: StyleValue) -> Self {
        self.base.insert((target.clone(), property), value);
        self
    }

    /// Declare a label. Later entries may position themselves relative to it.
    pub fn label(mut self, name: impl Into<String>, offset: TimeOffset) -> Self {
        self.entries.push(Entry::Label {
            name: name.into(),
            offset,
        });
        self
    }

    /// Append a segment.
    pub fn add(mut self, seg: SegmentDef) -> Self {
        self.entries.push(Entry::Segment(seg));
        self
    }

    /// Append one segment per target, each starting `each` seconds after the previous one.
    ///
    /// The first segment is placed at `at`.
    pub fn stagger(
        mut self,
        targets: &[ElementId],
        each: f64,
        at: TimeOffset,
        make: impl Fn(&ElementId) -> SegmentDef,
    ) -> Self {
        for (i, target) in targets.iter().enumerate() {
            let offset = if i == 0 {
                at.clone()
            } else {
                TimeOffset::WithPrevious(each)
            };
            self = self.add(make(target).at(offset));
        }
        self
    }

    /// Resolve labels and tracks into an immutable [`Timeline`].
    #[tracing::instrument(skip(self), fields(timeline = %self.name))]
    pub fn build(self) -> ScrollweaveResult<Timeline> {
        let mut labels: BTreeMap<String, f64> = BTreeMap::new();
        let mut prev: Option<(f64, f64)> = None;
        let mut segments: Vec<Segment> = Vec::new();

        for entry in self.entries {
            match entry {
                Entry::Label { name, offset } => {
                    let at = resolve_offset(&offset, &labels, prev)?;
                    if labels.insert(name.clone(), at).is_some() {
                        return Err(ScrollweaveError::timeline(format!(
                            "label '{name}' declared twice"
                        )));
                    }
                }
                Entry::Segment(def) => {
                    if !def.duration.is_finite() || def.duration < 0.0 {
                        return Err(ScrollweaveError::timeline(format!(
                            "segment on '{}' has invalid duration {}",
                            def.target, def.duration
                        )));
                    }
                    if def.properties.is_empty() {
                        return Err(ScrollweaveError::timeline(format!(
                            "segment on '{}' animates no properties",
                            def.target
                        )));
                    }
                    let start = resolve_offset(&def.offset, &labels, prev)?;
                    prev = Some((start, start + def.duration));
                    segments.push(Segment {
                        target: def.target,
                        properties: def.properties,
                        start,
                        duration: def.duration,
                        ease: def.ease,
                    });
                }
            }
        }

        let tracks = build_tracks(&segments, &self.base)?;
        let duration = segments
            .iter()
            .map(Segment::end)
            .chain(labels.values().copied())
            .fold(0.0_f64, f64::max);

        tracing::debug!(
            segments = segments.len(),
            tracks = tracks.len(),
            duration,
            "timeline built"
        );

        Ok(Timeline {
            name: self.name,
            labels,
            segments,
            tracks,
            duration,
        })
    }
}

fn resolve_offset(
    offset: &TimeOffset,
    labels: &BTreeMap<String, f64>,
    prev: Option<(f64, f64)>,
) -> ScrollweaveResult<f64> {
    let at = match offset {
        TimeOffset::At(secs) => *secs,
        TimeOffset::Label { name, delta } => {
            let base = labels.get(name).ok_or_else(|| {
                ScrollweaveError::timeline(format!("label '{name}' used before it was declared"))
            })?;
            base + delta
        }
        TimeOffset::AfterPrevious(delta) => prev.map_or(0.0, |(_, end)| end) + delta,
        TimeOffset::WithPrevious(delta) => prev.map_or(0.0, |(start, _)| start) + delta,
    };
    if !at.is_finite() || at < 0.0 {
        return Err(ScrollweaveError::timeline(format!(
            "offset {offset:?} resolves to negative or non-finite time {at}"
        )));
    }
    Ok(at)
}

fn build_tracks(
    segments: &[Segment],
    base: &HashMap<(ElementId, Property), StyleValue>,
) -> ScrollweaveResult<Vec<ResolvedTrack>> {
    let mut tracks: Vec<Track> = Vec::new();
    let mut idx_by_key: HashMap<(ElementId, Property), usize> = HashMap::new();

    for seg in segments {
        for (&property, tween) in &seg.properties {
            let key = (seg.target.clone(), property);
            let idx = *idx_by_key.entry(key).or_insert_with(|| {
                tracks.push(Track {
                    target: seg.target.clone(),
                    property,
                    keys: Vec::new(),
                });
                tracks.len() - 1
            });
            tracks[idx].keys.push(PendingKey {
                start: seg.start,
                duration: seg.duration,
                from: tween.from.clone(),
                to: tween.to.clone(),
                ease: tween.ease.unwrap_or(seg.ease),
            });
        }
    }

    tracks
        .into_iter()
        .map(|t| t.resolve(base))
        .collect::<ScrollweaveResult<Vec<_>>>()
}

struct PendingKey {
    start: f64,
    duration: f64,
    from: Option<StyleValue>,
    to: StyleValue,
    ease: Ease,
}

struct Track {
    target: ElementId,
    property: Property,
    keys: Vec<PendingKey>,
}

impl Track {
    fn resolve(
        mut self,
        base: &HashMap<(ElementId, Property), StyleValue>,
    ) -> ScrollweaveResult<ResolvedTrack> {
        self.keys.sort_by(|a, b| a.start.total_cmp(&b.start));
        if let Some(w) = self
            .keys
            .windows(2)
            .find(|w| (w[1].start - w[0].start).abs() < START_EPSILON)
        {
            return Err(ScrollweaveError::timeline(format!(
                "colliding writes to {}.{} at {}s",
                self.target, self.property, w[0].start
            )));
        }

        let mut carried = base.get(&(self.target.clone(), self.property)).cloned();
        let mut keys = Vec::with_capacity(self.keys.len());
        for k in self.keys {
            let from = match k.from.or(carried) {
                Some(v) => v,
                None => {
                    return Err(ScrollweaveError::timeline(format!(
                        "no start value for {}.{}: add a base value or use from_to",
                        self.target, self.property
                    )));
                }
            };
            carried = Some(k.to.clone());
            keys.push(TrackKey {
                start: k.start,
                duration: k.duration,
                from,
                to: k.to,
                ease: k.ease,
            });
        }

        Ok(ResolvedTrack {
            target: self.target,
            property: self.property,
            keys,
        })
    }
}

#[derive(Clone, Debug)]
struct TrackKey {
    start: f64,
    duration: f64,
    from: StyleValue,
    to: StyleValue,
    ease: Ease,
}

#[derive(Clone, Debug)]
struct ResolvedTrack {
    target: ElementId,
    property: Property,
    keys: Vec<TrackKey>, // sorted by start
}

impl ResolvedTrack {
    fn sample(&self, t: f64) -> StyleValue {
        let idx = self.keys.partition_point(|k| k.start <= t);
        if idx == 0 {
            return self.keys[0].from.clone();
        }
        let k = &self.keys[idx - 1];
        let local = if k.duration <= 0.0 {
            1.0
        } else {
            ((t - k.start) / k.duration).clamp(0.0, 1.0)
        };
        StyleValue::lerp(&k.from, &k.to, k.ease.apply(local))
    }
}

/// A resolved segment with an absolute start time.
#[derive(Clone, Debug)]
pub struct Segment {
    target: ElementId,
    properties: BTreeMap<Property, PropertyTween>,
    start: f64,
    duration: f64,
    ease: Ease,
}

impl Segment {
    /// Element the segment writes to.
    pub fn target(&self) -> &ElementId {
        &self.target
    }

    /// Absolute start in seconds.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Absolute end in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Default curve.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Properties animated by this segment.
    pub fn properties(&self) -> impl Iterator<Item = (&Property, &PropertyTween)> {
        self.properties.iter()
    }
}

/// Immutable list of segments plus the resolved label table.
///
/// Evaluation is a pure function of progress.
#[derive(Clone, Debug)]
pub struct Timeline {
    name: String,
    labels: BTreeMap<String, f64>,
    segments: Vec<Segment>,
    tracks: Vec<ResolvedTrack>,
    duration: f64,
}

impl Timeline {
    /// Timeline name, for logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total length in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Resolved absolute position of a label.
    pub fn label(&self, name: &str) -> Option<f64> {
        self.labels.get(name).copied()
    }

    /// Label position as normalized progress.
    pub fn label_progress(&self, name: &str) -> Option<f64> {
        let at = self.label(name)?;
        Some(if self.duration > 0.0 {
            at / self.duration
        } else {
            1.0
        })
    }

    /// Resolved segments in declaration order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Every `(target, property)` pair this timeline writes.
    pub fn properties(&self) -> BTreeSet<(ElementId, Property)> {
        self.tracks
            .iter()
            .map(|t| (t.target.clone(), t.property))
            .collect()
    }

    /// Writes for normalized `progress`, clamped to `[0, 1]`.
    pub fn evaluate(&self, progress: f64) -> Vec<PropertyWrite> {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.evaluate_at(p * self.duration)
    }

    /// Writes at absolute time `secs`, clamped to the timeline length.
    pub fn evaluate_at(&self, secs: f64) -> Vec<PropertyWrite> {
        let t = secs.clamp(0.0, self.duration);
        self.tracks
            .iter()
            .map(|track| PropertyWrite {
                target: track.target.clone(),
                property: track.property,
                value: track.sample(t),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
