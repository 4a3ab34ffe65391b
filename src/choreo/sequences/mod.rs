//! The page's compositions. Each module exposes `compose` (animated path) and `final_state`
//! (reduced-motion path) over the same element refs.

pub mod cover;
pub mod hero_intro;
pub mod hero_scroll;
pub mod label_exit;
pub mod skills;

use crate::{
    animation::value::StyleValue,
    choreo::composition::{Composition, SequenceName},
    choreo::reduced::FinalState,
    foundation::core::ElementId,
    foundation::error::{ScrollweaveError, ScrollweaveResult},
    scroll::frame::FrameCtx,
    scroll::geometry::GeometryProvider,
    scroll::sink::WriteBatch,
};

/// Overlay opacity over the revealed video.
pub(crate) const OVERLAY_OPACITY: f64 = 0.45;

pub(crate) fn px(v: f64) -> StyleValue {
    StyleValue::Px(v)
}

pub(crate) fn num(v: f64) -> StyleValue {
    StyleValue::Number(v)
}

fn default_container() -> ElementId {
    ElementId::new("document")
}

/// Resolve an optional ref, failing when it was not provided or is no longer rendered.
pub(crate) fn require<'a>(
    sequence: SequenceName,
    field: &'static str,
    id: &'a Option<ElementId>,
    geometry: &dyn GeometryProvider,
) -> ScrollweaveResult<&'a ElementId> {
    match id {
        Some(id) if geometry.is_attached(id) => Ok(id),
        Some(id) => Err(ScrollweaveError::missing_ref(format!(
            "{sequence}: {field} '{id}' is not attached"
        ))),
        None => Err(ScrollweaveError::missing_ref(format!(
            "{sequence}: {field} not provided"
        ))),
    }
}

/// Resolve the scroll container.
pub(crate) fn require_container<'a>(
    sequence: SequenceName,
    container: &'a ElementId,
    geometry: &dyn GeometryProvider,
) -> ScrollweaveResult<&'a ElementId> {
    geometry
        .scroll_y(container)
        .map(|_| container)
        .ok_or_else(|| {
            ScrollweaveError::missing_ref(format!("{sequence}: container '{container}' is detached"))
        })
}

/// Elements shared by the three hero compositions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeroRefs {
    /// Scroll container (locked during the intro).
    pub container: ElementId,
    /// Hero section; pinned during the scroll morph.
    pub section: Option<ElementId>,
    /// The pill that expands, then docks into the navigation row.
    pub pill: Option<ElementId>,
    /// Placeholder text inside the compact pill.
    pub pill_label: Option<ElementId>,
    /// Navigation content shown once docked.
    pub pill_content: Option<ElementId>,
    pub video: Option<ElementId>,
    pub overlay: Option<ElementId>,
    pub name_label: Option<ElementId>,
    pub title_label: Option<ElementId>,
    pub nav_row: Option<ElementId>,
}

impl Default for HeroRefs {
    fn default() -> Self {
        Self {
            container: default_container(),
            section: None,
            pill: None,
            pill_label: None,
            pill_content: None,
            video: None,
            overlay: None,
            name_label: None,
            title_label: None,
            nav_row: None,
        }
    }
}

/// Elements of the cover section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverRefs {
    pub container: ElementId,
    /// Section pinned while the parallax plays.
    pub section: Option<ElementId>,
    /// Viewport-fixed element that gets covered.
    pub floating: Option<ElementId>,
    /// Section that scrolls over `floating`.
    pub trailing: Option<ElementId>,
    pub block_a: Option<ElementId>,
    pub block_b: Option<ElementId>,
}

impl Default for CoverRefs {
    fn default() -> Self {
        Self {
            container: default_container(),
            section: None,
            floating: None,
            trailing: None,
            block_a: None,
            block_b: None,
        }
    }
}

/// Elements of the skills section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SkillsRefs {
    pub container: ElementId,
    pub section: Option<ElementId>,
    /// Earlier section that must be fully scrolled past before the entrance plays.
    pub gate: Option<ElementId>,
    pub heading: Option<ElementId>,
    pub row_a: Option<ElementId>,
    pub row_b: Option<ElementId>,
}

impl Default for SkillsRefs {
    fn default() -> Self {
        Self {
            container: default_container(),
            section: None,
            gate: None,
            heading: None,
            row_a: None,
            row_b: None,
        }
    }
}

/// A composition together with the element refs it is built from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "sequence", content = "refs", rename_all = "kebab-case")]
pub enum Sequence {
    HeroIntro(HeroRefs),
    HeroScroll(HeroRefs),
    LabelExit(HeroRefs),
    Cover(CoverRefs),
    SkillsEntrance(SkillsRefs),
}

impl Sequence {
    pub fn name(&self) -> SequenceName {
        match self {
            Self::HeroIntro(_) => SequenceName::HeroIntro,
            Self::HeroScroll(_) => SequenceName::HeroScroll,
            Self::LabelExit(_) => SequenceName::LabelExit,
            Self::Cover(_) => SequenceName::Cover,
            Self::SkillsEntrance(_) => SequenceName::SkillsEntrance,
        }
    }

    /// Build the animated composition. Pin writes are queued into `batch` only on success.
    pub fn compose(
        &self,
        ctx: &FrameCtx<'_>,
        batch: &mut WriteBatch,
    ) -> ScrollweaveResult<Composition> {
        let mut staged = WriteBatch::new();
        let composition = match self {
            Self::HeroIntro(r) => hero_intro::compose(r, ctx, &mut staged),
            Self::HeroScroll(r) => hero_scroll::compose(r, ctx, &mut staged),
            Self::LabelExit(r) => label_exit::compose(r, ctx, &mut staged),
            Self::Cover(r) => cover::compose(r, ctx, &mut staged),
            Self::SkillsEntrance(r) => skills::compose(r, ctx, &mut staged),
        }?;
        batch.extend(staged.writes().iter().cloned());
        Ok(composition)
    }

    /// Like [`compose`](Self::compose), but degrades to a no-op composition on failure.
    pub fn compose_or_noop(&self, ctx: &FrameCtx<'_>, batch: &mut WriteBatch) -> Composition {
        match self.compose(ctx, batch) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(sequence = %self.name(), error = %e, "composition skipped");
                Composition::noop(self.name())
            }
        }
    }

    /// Terminal values of the animated path, for reduced motion.
    pub fn final_state(&self, ctx: &FrameCtx<'_>) -> ScrollweaveResult<FinalState> {
        match self {
            Self::HeroIntro(r) => hero_intro::final_state(r, ctx),
            Self::HeroScroll(r) => hero_scroll::final_state(r, ctx),
            Self::LabelExit(r) => label_exit::final_state(r, ctx),
            Self::Cover(r) => cover::final_state(r, ctx),
            Self::SkillsEntrance(r) => skills::final_state(r, ctx),
        }
    }
}

/// Every ref a page provides, as loaded from a scene file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageRefs {
    pub hero: Option<HeroRefs>,
    pub cover: Option<CoverRefs>,
    pub skills: Option<SkillsRefs>,
}

impl PageRefs {
    /// Sequences in mount order.
    ///
    /// The intro comes after the other hero compositions so its writes win on the first frame,
    /// when every composition emits its initial state.
    pub fn sequences(&self) -> Vec<Sequence> {
        let mut out = Vec::new();
        if let Some(h) = &self.hero {
            out.push(Sequence::LabelExit(h.clone()));
            out.push(Sequence::HeroScroll(h.clone()));
            out.push(Sequence::HeroIntro(h.clone()));
        }
        if let Some(c) = &self.cover {
            out.push(Sequence::Cover(c.clone()));
        }
        if let Some(s) = &self.skills {
            out.push(Sequence::SkillsEntrance(s.clone()));
        }
        out
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/page.rs"]
pub(crate) mod page;

#[cfg(test)]
#[path = "../../../tests/unit/choreo/sequences/mod.rs"]
mod tests;
