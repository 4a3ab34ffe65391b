use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::{
    choreo::composition::{Composition, SequenceName},
    choreo::reduced::apply_final_state,
    choreo::sequences::{CoverRefs, HeroRefs, PageRefs, Sequence, SkillsRefs},
    foundation::config::EngineConfig,
    foundation::core::{ElementId, Viewport},
    foundation::error::ScrollweaveResult,
    lifecycle::preference::{MotionPreference, MotionPreferenceSource, SubscriptionId},
    scroll::debounce::ResizeDebouncer,
    scroll::frame::FrameCtx,
    scroll::geometry::{GeometryProvider, SceneGeometry},
    scroll::sink::{MediaControl, StyleSink, WriteBatch},
};

/// Handle for tearing down one mounted sequence.
///
/// Disposing twice, or disposing after the sequence was re-mounted, is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Disposer {
    sequence: SequenceName,
    generation: u64,
}

impl Disposer {
    pub fn sequence(&self) -> SequenceName {
        self.sequence
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Inputs processed by [`Engine::pump`], strictly in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    /// The scroll position changed; run a frame.
    Scroll { now_ms: f64 },
    /// Animation frame tick (drives playheads, smoothing and eased commands).
    Frame { now_ms: f64 },
    /// The viewport was resized; re-measured after the quiet period.
    Resize { now_ms: f64 },
    /// Re-measure now (e.g. after fonts or content changed layout).
    Refresh { now_ms: f64 },
    /// The platform motion preference changed.
    PreferenceChanged(MotionPreference),
}

/// Counters for tests and diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct EngineStats {
    /// Frames run.
    pub frames: u64,
    /// Re-measurements (debounced resizes and explicit refreshes).
    pub refreshes: u64,
    /// Full dispose-and-rebuild passes over every mounted sequence.
    pub recompositions: u64,
    /// Reduced-motion final states applied.
    pub final_states_applied: u64,
    /// Compositions torn down.
    pub disposals: u64,
}

#[derive(Debug)]
enum SlotState {
    Animated(Composition),
    /// Terminal state written directly; nothing runs.
    Settled,
}

#[derive(Debug)]
struct Slot {
    sequence: Sequence,
    generation: u64,
    state: SlotState,
}

type EventQueue = Rc<RefCell<VecDeque<EngineEvent>>>;

/// Owns every mounted composition and serializes scroll, frame, resize and preference events
/// through one queue.
pub struct Engine<G, S, M> {
    geometry: G,
    sink: S,
    media: M,
    config: EngineConfig,
    preference: MotionPreference,
    source: Rc<dyn MotionPreferenceSource>,
    subscription: SubscriptionId,
    queue: EventQueue,
    slots: Vec<Slot>,
    next_generation: u64,
    intro_played: bool,
    debouncer: ResizeDebouncer,
    band: usize,
    clock_ms: f64,
    stats: EngineStats,
}

impl<G, S, M> Engine<G, S, M>
where
    G: GeometryProvider,
    S: StyleSink,
    M: MediaControl,
{
    /// Create an engine and subscribe to preference changes.
    pub fn new(
        geometry: G,
        sink: S,
        media: M,
        config: EngineConfig,
        source: Rc<dyn MotionPreferenceSource>,
    ) -> ScrollweaveResult<Self> {
        config.validate()?;
        let queue: EventQueue = Rc::new(RefCell::new(VecDeque::new()));
        let listener_queue = Rc::clone(&queue);
        let subscription = source.subscribe(Box::new(move |p| {
            listener_queue
                .borrow_mut()
                .push_back(EngineEvent::PreferenceChanged(p));
        }));
        let band = config.breakpoint_band(geometry.viewport().width);
        let debouncer = ResizeDebouncer::new(config.resize_quiet_ms);
        Ok(Self {
            preference: source.get(),
            geometry,
            sink,
            media,
            config,
            source,
            subscription,
            queue,
            slots: Vec::new(),
            next_generation: 1,
            intro_played: false,
            debouncer,
            band,
            clock_ms: 0.0,
            stats: EngineStats::default(),
        })
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutable layout access for hosts that own the geometry model.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Preference the current compositions were built for.
    pub fn preference(&self) -> MotionPreference {
        self.preference
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Latest timestamp seen.
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Events waiting for [`pump`](Self::pump).
    pub fn pending_events(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Mounted sequences, in mount order.
    pub fn mounted(&self) -> impl Iterator<Item = SequenceName> + '_ {
        self.slots.iter().map(|s| s.sequence.name())
    }

    /// Running composition of `name`, if mounted on the animated path.
    pub fn composition(&self, name: SequenceName) -> Option<&Composition> {
        self.slots
            .iter()
            .find(|s| s.sequence.name() == name)
            .and_then(|s| match &s.state {
                SlotState::Animated(c) => Some(c),
                SlotState::Settled => None,
            })
    }

    /// Whether `name` is mounted with a non-empty animated composition.
    pub fn is_live(&self, name: SequenceName) -> bool {
        self.composition(name).is_some_and(|c| !c.is_noop())
    }

    /// Every element currently pinned, across all compositions.
    pub fn pinned_elements(&self) -> Vec<&ElementId> {
        self.slots
            .iter()
            .filter_map(|s| match &s.state {
                SlotState::Animated(c) => Some(c),
                SlotState::Settled => None,
            })
            .flat_map(Composition::pinned_elements)
            .collect()
    }

    /// Mount `sequence`, replacing a live instance of the same sequence.
    pub fn mount(&mut self, sequence: Sequence) -> Disposer {
        let name = sequence.name();
        let existing = self.slots.iter().position(|s| s.sequence.name() == name);
        if let Some(i) = existing {
            self.teardown(i);
        }
        let state = self.build(&sequence);
        let generation = self.next_generation;
        self.next_generation += 1;
        let slot = Slot {
            sequence,
            generation,
            state,
        };
        match existing {
            Some(i) => self.slots[i] = slot,
            None => self.slots.push(slot),
        }
        tracing::debug!(sequence = %name, generation, "mounted");
        Disposer {
            sequence: name,
            generation,
        }
    }

    pub fn mount_hero_intro(&mut self, refs: HeroRefs) -> Disposer {
        self.mount(Sequence::HeroIntro(refs))
    }

    pub fn mount_hero_scroll(&mut self, refs: HeroRefs) -> Disposer {
        self.mount(Sequence::HeroScroll(refs))
    }

    pub fn mount_label_exit(&mut self, refs: HeroRefs) -> Disposer {
        self.mount(Sequence::LabelExit(refs))
    }

    pub fn mount_cover(&mut self, refs: CoverRefs) -> Disposer {
        self.mount(Sequence::Cover(refs))
    }

    pub fn mount_skills(&mut self, refs: SkillsRefs) -> Disposer {
        self.mount(Sequence::SkillsEntrance(refs))
    }

    /// Mount the three hero compositions, intro last so it owns the first frame.
    pub fn mount_hero_animations(&mut self, refs: HeroRefs) -> Vec<Disposer> {
        self.mount_all(vec![
            Sequence::LabelExit(refs.clone()),
            Sequence::HeroScroll(refs.clone()),
            Sequence::HeroIntro(refs),
        ])
    }

    /// Mount everything `refs` provides.
    pub fn mount_page(&mut self, refs: &PageRefs) -> Vec<Disposer> {
        self.mount_all(refs.sequences())
    }

    /// Mount `sequences`. Those that settle immediately go first, in page order, so later
    /// terminal states overwrite earlier ones the way scrolling through the page would.
    fn mount_all(&mut self, sequences: Vec<Sequence>) -> Vec<Disposer> {
        let mut indexed: Vec<(usize, Sequence)> = sequences.into_iter().enumerate().collect();
        indexed.sort_by_key(|(i, s)| self.build_key(s.name(), *i));
        indexed.into_iter().map(|(_, s)| self.mount(s)).collect()
    }

    /// Tear down the sequence behind `disposer`. Returns `false` if it was already gone.
    pub fn dispose(&mut self, disposer: Disposer) -> bool {
        let Some(i) = self.slots.iter().position(|s| {
            s.sequence.name() == disposer.sequence && s.generation == disposer.generation
        }) else {
            tracing::trace!(sequence = %disposer.sequence, "stale or repeated dispose ignored");
            return false;
        };
        self.teardown(i);
        self.slots.remove(i);
        true
    }

    /// Tear down every mounted sequence.
    pub fn dispose_all(&mut self) {
        for i in 0..self.slots.len() {
            self.teardown(i);
        }
        self.slots.clear();
        self.debouncer.cancel();
    }

    pub fn push(&self, event: EngineEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn on_scroll(&self, now_ms: f64) {
        self.push(EngineEvent::Scroll { now_ms });
    }

    pub fn on_frame(&self, now_ms: f64) {
        self.push(EngineEvent::Frame { now_ms });
    }

    pub fn on_resize(&self, now_ms: f64) {
        self.push(EngineEvent::Resize { now_ms });
    }

    pub fn request_refresh(&self, now_ms: f64) {
        self.push(EngineEvent::Refresh { now_ms });
    }

    /// Process queued events in order. Returns how many were handled.
    #[tracing::instrument(skip(self), fields(slots = self.slots.len()))]
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.handle(event);
            handled += 1;
        }
        handled
    }

    fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Scroll { now_ms } | EngineEvent::Frame { now_ms } => {
                self.tick(now_ms);
                if self.debouncer.poll(self.clock_ms) {
                    self.relayout();
                }
                self.frame();
            }
            EngineEvent::Resize { now_ms } => {
                self.tick(now_ms);
                self.debouncer.note(self.clock_ms);
            }
            EngineEvent::Refresh { now_ms } => {
                self.tick(now_ms);
                self.debouncer.cancel();
                self.relayout();
            }
            EngineEvent::PreferenceChanged(p) => self.set_preference(p),
        }
    }

    fn tick(&mut self, now_ms: f64) {
        if now_ms.is_finite() {
            self.clock_ms = self.clock_ms.max(now_ms);
        }
    }

    fn frame(&mut self) {
        let ctx = FrameCtx::new(&self.geometry, &self.config, self.clock_ms);
        let mut batch = WriteBatch::new();
        for slot in &mut self.slots {
            if let SlotState::Animated(c) = &mut slot.state {
                c.on_frame(&ctx, &mut batch, &mut self.media);
            }
        }
        batch.flush(&mut self.sink);
        self.stats.frames += 1;
    }

    /// Re-measure after a layout change. Crossing a breakpoint rebuilds everything instead.
    fn relayout(&mut self) {
        self.stats.refreshes += 1;
        let band = self.config.breakpoint_band(self.geometry.viewport().width);
        if band != self.band {
            tracing::debug!(from = self.band, to = band, "breakpoint crossed");
            self.band = band;
            self.recompose_all();
            return;
        }

        let ctx = FrameCtx::new(&self.geometry, &self.config, self.clock_ms);
        let mut batch = WriteBatch::new();
        // Terminal values can be layout-derived (the dock slot); re-measure them first so live
        // compositions win on shared properties.
        let mut settled: Vec<usize> = (0..self.slots.len())
            .filter(|&i| matches!(self.slots[i].state, SlotState::Settled))
            .collect();
        settled.sort_by_key(|&i| self.slots[i].sequence.name());
        for i in settled {
            let sequence = &self.slots[i].sequence;
            match sequence.final_state(&ctx) {
                Ok(state) => state.queue(&mut batch),
                Err(e) => {
                    tracing::debug!(sequence = %sequence.name(), error = %e, "final state skipped")
                }
            }
        }
        for slot in &mut self.slots {
            if let SlotState::Animated(c) = &mut slot.state {
                c.refresh(&ctx, &mut batch, &mut self.media);
            }
        }
        batch.flush(&mut self.sink);
    }

    fn set_preference(&mut self, preference: MotionPreference) {
        if preference == self.preference {
            return;
        }
        tracing::info!(?preference, "motion preference changed; recomposing");
        self.preference = preference;
        self.recompose_all();
    }

    fn recompose_all(&mut self) {
        for i in 0..self.slots.len() {
            self.teardown(i);
        }
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&i| self.build_key(self.slots[i].sequence.name(), i));
        for i in order {
            let sequence = self.slots[i].sequence.clone();
            self.slots[i].state = self.build(&sequence);
        }
        self.stats.recompositions += 1;
    }

    /// Whether `name` would be written as a final state rather than animated.
    fn settles(&self, name: SequenceName) -> bool {
        self.preference.is_reduced() || (name == SequenceName::HeroIntro && self.intro_played)
    }

    /// Build order: settled sequences in page order, then animated ones in mount order.
    fn build_key(&self, name: SequenceName, mount_index: usize) -> (bool, usize) {
        if self.settles(name) {
            (false, name as usize)
        } else {
            (true, mount_index)
        }
    }

    fn teardown(&mut self, index: usize) {
        let SlotState::Animated(c) = &mut self.slots[index].state else {
            return;
        };
        if c.is_disposed() {
            return;
        }
        let mut batch = WriteBatch::new();
        c.dispose(&mut batch, &mut self.media);
        batch.flush(&mut self.sink);
        self.stats.disposals += 1;
    }

    /// Build the animated composition, or write the terminal state under reduced motion.
    ///
    /// The intro runs at most once per engine; afterwards it is always settled.
    fn build(&mut self, sequence: &Sequence) -> SlotState {
        let name = sequence.name();
        let ctx = FrameCtx::new(&self.geometry, &self.config, self.clock_ms);
        let is_intro = name == SequenceName::HeroIntro;

        if self.settles(name) {
            match sequence.final_state(&ctx) {
                Ok(state) => {
                    apply_final_state(&state, &mut self.sink, &mut self.media);
                    self.stats.final_states_applied += 1;
                    if is_intro {
                        self.intro_played = true;
                    }
                }
                Err(e) => tracing::warn!(sequence = %name, error = %e, "final state skipped"),
            }
            return SlotState::Settled;
        }

        let mut batch = WriteBatch::new();
        let composition = sequence.compose_or_noop(&ctx, &mut batch);
        batch.flush(&mut self.sink);
        if is_intro && !composition.is_noop() {
            self.intro_played = true;
        }
        SlotState::Animated(composition)
    }
}

/// Convenience for hosts driving a [`SceneGeometry`] directly.
impl<S, M> Engine<SceneGeometry, S, M>
where
    S: StyleSink,
    M: MediaControl,
{
    /// Move the scroll position and queue a scroll event.
    pub fn scroll_to(&mut self, y: f64, now_ms: f64) {
        self.geometry.set_scroll(y);
        self.on_scroll(now_ms);
    }

    /// Change the viewport and queue a resize event.
    pub fn resize_to(&mut self, viewport: Viewport, now_ms: f64) {
        self.geometry.set_viewport(viewport);
        self.on_resize(now_ms);
    }
}

impl<G, S, M> Drop for Engine<G, S, M> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

impl<G, S, M> std::fmt::Debug for Engine<G, S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("preference", &self.preference)
            .field("slots", &self.slots.len())
            .field("band", &self.band)
            .field("clock_ms", &self.clock_ms)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/engine.rs"]
mod tests;
