use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::{
    animation::timeline::Timeline,
    animation::value::{Property, StyleWrite},
    choreo::sync::SyncController,
    foundation::core::ElementId,
    scroll::frame::FrameCtx,
    scroll::sink::{MediaControl, WriteBatch, start_media},
    scroll::trigger::{ScrollTrigger, TriggerUpdate},
};

/// The five page compositions, ordered as they play down the page.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceName {
    HeroIntro,
    HeroScroll,
    LabelExit,
    Cover,
    SkillsEntrance,
}

impl SequenceName {
    pub const ALL: [SequenceName; 5] = [
        Self::HeroIntro,
        Self::HeroScroll,
        Self::LabelExit,
        Self::Cover,
        Self::SkillsEntrance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeroIntro => "hero-intro",
            Self::HeroScroll => "hero-scroll",
            Self::LabelExit => "label-exit",
            Self::Cover => "cover",
            Self::SkillsEntrance => "skills-entrance",
        }
    }
}

impl std::fmt::Display for SequenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a bound timeline takes its progress from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Drive {
    /// Visual progress of a trigger.
    Trigger(usize),
    /// Visual progress of `trigger`, held at 0 until the `gate` toggle trigger is active.
    Gated { trigger: usize, gate: usize },
    /// Wall-clock playhead of the composition.
    Playhead,
}

#[derive(Debug)]
struct Binding {
    timeline: Timeline,
    drive: Drive,
    last_progress: Option<f64>,
}

#[derive(Debug)]
struct ToggleEffect {
    trigger: usize,
    target: ElementId,
    on: SmallVec<[StyleWrite; 2]>,
    off: SmallVec<[StyleWrite; 2]>,
}

#[derive(Debug)]
struct MediaCue {
    target: ElementId,
    binding: usize,
    at: f64,
    fired: bool,
}

#[derive(Debug)]
struct SyncBinding {
    trigger: usize,
    controller: SyncController,
}

/// Time-based one-shot playback.
#[derive(Clone, Copy, Debug)]
struct Playhead {
    start_ms: f64,
    duration_ms: f64,
    finished: bool,
}

impl Playhead {
    fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// A named set of triggers, timelines and side effects with a single idempotent dispose.
///
/// One frame runs in a fixed order: every trigger updates, then every bound timeline is
/// evaluated, then toggles and media cues fire, then the sync controller reconciles against
/// the timeline writes already queued. The caller flushes the batch once afterwards.
#[derive(Debug)]
pub struct Composition {
    name: SequenceName,
    triggers: Vec<ScrollTrigger>,
    visual: Vec<f64>,
    bindings: Vec<Binding>,
    toggles: Vec<ToggleEffect>,
    cues: Vec<MediaCue>,
    sync: Option<SyncBinding>,
    playhead: Option<Playhead>,
    disposed: bool,
}

impl Composition {
    /// Empty composition.
    pub fn new(name: SequenceName) -> Self {
        Self {
            name,
            triggers: Vec::new(),
            visual: Vec::new(),
            bindings: Vec::new(),
            toggles: Vec::new(),
            cues: Vec::new(),
            sync: None,
            playhead: None,
            disposed: false,
        }
    }

    /// Composition that does nothing; used when required elements are missing.
    pub fn noop(name: SequenceName) -> Self {
        Self::new(name)
    }

    /// Register a trigger; returns its index for [`Drive`] references.
    pub fn add_trigger(&mut self, trigger: ScrollTrigger) -> usize {
        self.triggers.push(trigger);
        self.visual.push(0.0);
        self.triggers.len() - 1
    }

    /// Bind a timeline to a progress source; returns the binding index.
    pub fn bind(&mut self, timeline: Timeline, drive: Drive) -> usize {
        self.bindings.push(Binding {
            timeline,
            drive,
            last_progress: None,
        });
        self.bindings.len() - 1
    }

    /// Write `on` when `trigger` enters its range and `off` when it leaves.
    pub fn toggle(
        &mut self,
        trigger: usize,
        target: ElementId,
        on: impl IntoIterator<Item = StyleWrite>,
        off: impl IntoIterator<Item = StyleWrite>,
    ) {
        self.toggles.push(ToggleEffect {
            trigger,
            target,
            on: on.into_iter().collect(),
            off: off.into_iter().collect(),
        });
    }

    /// Start `target` muted once `binding` reaches `at` progress. Fires at most once.
    pub fn cue_media(&mut self, target: ElementId, binding: usize, at: f64) {
        self.cues.push(MediaCue {
            target,
            binding,
            at,
            fired: false,
        });
    }

    /// Attach a sync controller fed by `trigger`.
    pub fn sync_with(&mut self, trigger: usize, controller: SyncController) {
        self.sync = Some(SyncBinding {
            trigger,
            controller,
        });
    }

    /// Play [`Drive::Playhead`] bindings over `duration_ms`, starting at `start_ms`.
    pub fn play(&mut self, start_ms: f64, duration_ms: f64) {
        self.playhead = Some(Playhead {
            start_ms,
            duration_ms: duration_ms.max(0.0),
            finished: false,
        });
    }

    pub fn name(&self) -> SequenceName {
        self.name
    }

    /// Whether nothing was constructed.
    pub fn is_noop(&self) -> bool {
        self.triggers.is_empty() && self.bindings.is_empty() && self.toggles.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether a one-shot playhead is still running.
    pub fn is_playing(&self) -> bool {
        self.playhead.is_some_and(|p| !p.finished) && !self.disposed
    }

    pub fn triggers(&self) -> &[ScrollTrigger] {
        &self.triggers
    }

    pub fn sync(&self) -> Option<&SyncController> {
        self.sync.as_ref().map(|s| &s.controller)
    }

    /// Elements currently held fixed by this composition's pins.
    pub fn pinned_elements(&self) -> impl Iterator<Item = &ElementId> {
        self.triggers
            .iter()
            .filter(|t| t.is_pinned())
            .map(|t| &t.spec().trigger)
    }

    /// Every `(element, property)` an animated frame of this composition may write, pins
    /// excluded.
    pub fn animated_properties(&self) -> BTreeSet<(ElementId, Property)> {
        let mut out: BTreeSet<(ElementId, Property)> = self
            .bindings
            .iter()
            .flat_map(|b| b.timeline.properties())
            .collect();
        for t in &self.toggles {
            out.extend(t.on.iter().chain(&t.off).map(|w| (t.target.clone(), w.property)));
        }
        if let Some(s) = &self.sync {
            out.insert((s.controller.target().clone(), Property::Left));
            out.insert((s.controller.target().clone(), Property::Top));
        }
        out
    }

    /// Run one frame.
    pub fn on_frame(
        &mut self,
        ctx: &FrameCtx<'_>,
        batch: &mut WriteBatch,
        media: &mut dyn MediaControl,
    ) {
        self.step(ctx, batch, media, false);
    }

    /// Re-measure every trigger and re-apply current state against the new layout.
    ///
    /// The sync controller sees this as idle and jumps rather than eases.
    pub fn refresh(
        &mut self,
        ctx: &FrameCtx<'_>,
        batch: &mut WriteBatch,
        media: &mut dyn MediaControl,
    ) {
        if self.disposed {
            return;
        }
        for t in &mut self.triggers {
            t.refresh(ctx, batch);
        }
        for b in &mut self.bindings {
            b.last_progress = None;
        }
        self.step(ctx, batch, media, true);
    }

    fn step(
        &mut self,
        ctx: &FrameCtx<'_>,
        batch: &mut WriteBatch,
        media: &mut dyn MediaControl,
        idle: bool,
    ) {
        if self.disposed {
            return;
        }

        let updates: SmallVec<[Option<TriggerUpdate>; 4]> =
            self.triggers.iter_mut().map(|t| t.update(ctx, batch)).collect();
        for (v, u) in self.visual.iter_mut().zip(&updates) {
            if let Some(u) = u {
                *v = u.visual;
            }
        }

        let playhead = self
            .playhead
            .filter(|p| !p.finished)
            .map(|p| p.progress(ctx.now_ms));

        for b in &mut self.bindings {
            let progress = match b.drive {
                Drive::Trigger(i) => updates[i].map(|u| u.visual),
                Drive::Gated { trigger, gate } => (updates[trigger].is_some()
                    || updates[gate].is_some())
                .then(|| {
                    if self.triggers[gate].is_active() {
                        self.visual[trigger]
                    } else {
                        0.0
                    }
                }),
                Drive::Playhead => playhead,
            };
            if let Some(p) = progress
                && b.last_progress != Some(p)
            {
                batch.extend(b.timeline.evaluate(p));
                b.last_progress = Some(p);
            }
        }

        if let Some(p) = playhead
            && p >= 1.0
            && let Some(ph) = &mut self.playhead
        {
            ph.finished = true;
            tracing::debug!(composition = %self.name, "playback complete");
        }

        for t in &self.toggles {
            if let Some(Some(active)) = updates[t.trigger].map(|u| u.toggled) {
                let writes = if active { &t.on } else { &t.off };
                for w in writes {
                    batch.push(&t.target, w.property, w.value.clone());
                }
            }
        }

        self.fire_cues(media);

        if let Some(s) = &mut self.sync {
            if let Some(u) = updates[s.trigger] {
                let active = !idle && u.active && u.scroll_moved;
                let outcome = s.controller.reconcile(ctx, u.visual, active, batch);
                tracing::trace!(composition = %self.name, ?outcome, "reconciled");
            }
            s.controller.advance(ctx.now_ms, batch);
        }
    }

    fn fire_cues(&mut self, media: &mut dyn MediaControl) {
        for cue in &mut self.cues {
            if cue.fired {
                continue;
            }
            let reached = self
                .bindings
                .get(cue.binding)
                .and_then(|b| b.last_progress)
                .is_some_and(|p| p >= cue.at);
            if reached {
                cue.fired = true;
                start_media(media, &cue.target);
            }
        }
    }

    /// Tear everything down. Safe to call any number of times.
    ///
    /// Pins are released back to normal flow; values already written by timelines stay. A
    /// one-shot still playing is first seeked to its end so it never strands a half-finished
    /// state (such as a scroll lock).
    pub fn dispose(&mut self, batch: &mut WriteBatch, media: &mut dyn MediaControl) {
        if self.disposed {
            return;
        }
        if let Some(ph) = &mut self.playhead
            && !ph.finished
        {
            ph.finished = true;
            for b in &mut self.bindings {
                if b.drive == Drive::Playhead {
                    batch.extend(b.timeline.evaluate(1.0));
                    b.last_progress = Some(1.0);
                }
            }
            self.fire_cues(media);
        }
        for t in &mut self.triggers {
            t.dispose(batch);
        }
        if let Some(s) = &mut self.sync {
            s.controller.cancel();
        }
        self.disposed = true;
        tracing::debug!(composition = %self.name, "disposed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/choreo/composition.rs"]
mod tests;
