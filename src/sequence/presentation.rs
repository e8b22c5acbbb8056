//! Viewing-time sequencing for the active slide.
//!
//! On entry every enabled click-gated element that can play is hidden before anything paints,
//! and every other enabled animation starts at once. A gated element whose preset cannot play
//! stays visible and is treated as static. Each click then reveals the next pending gated
//! element in click order; once none remain, clicks fall through to slide navigation. Leaving a
//! slide discards its state, so revisiting it replays from entry.

use crate::animation::tween::CancelHandle;
use crate::deck::{ElementData, Slide};
use crate::foundation::core::AnimProperty;
use crate::foundation::error::MotionResult;
use crate::sequence::{PlaybackCtx, Staged, log_declined, stage};
use std::collections::HashSet;

/// Per-slide progress through the click sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceState {
    pub animated_element_ids: HashSet<String>,
    /// Clicks consumed as reveals.
    pub click_count: u32,
}

/// What a click did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The click revealed this element.
    Revealed(String),
    /// No reveal pending; the click belongs to slide navigation.
    NavigateNext,
}

impl AdvanceOutcome {
    /// `true` when the click was used for a reveal.
    pub fn consumed(&self) -> bool {
        matches!(self, Self::Revealed(_))
    }
}

#[derive(Debug, Default)]
pub struct Presenter {
    slide_index: Option<usize>,
    state: SequenceState,
    running: Vec<(String, CancelHandle)>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slide_index(&self) -> Option<usize> {
        self.slide_index
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    /// Number of animations still playing on the active slide.
    pub fn running(&self) -> usize {
        self.running.iter().filter(|(_, h)| h.is_running()).count()
    }

    /// Cancel the slide's animations and forget its sequence state.
    pub fn teardown(&mut self) {
        for (_, handle) in self.running.drain(..) {
            handle.cancel();
        }
        self.state = SequenceState::default();
        self.slide_index = None;
    }

    #[tracing::instrument(skip(self, ctx, slide), fields(slide = %slide.id))]
    pub fn enter_slide(&mut self, ctx: &PlaybackCtx<'_>, slide_index: usize, slide: &Slide) {
        self.teardown();
        self.slide_index = Some(slide_index);

        for element in slide.elements.iter().filter(|e| e.is_click_gated()) {
            match stage_configured(ctx, element) {
                Ok(staged) => {
                    let mut node = staged.target.node.borrow_mut();
                    node.set_property(AnimProperty::Opacity, 0.0);
                    node.set_visible(false);
                    node.set_hit_testable(false);
                    node.request_repaint();
                }
                Err(err) => {
                    log_declined(&element.id, &err);
                    self.state.animated_element_ids.insert(element.id.clone());
                }
            }
        }

        let autos = slide
            .elements
            .iter()
            .filter(|e| e.active_animation().is_some() && !e.is_click_gated());
        for element in autos {
            if self.start(ctx, element).is_ok() {
                self.state.animated_element_ids.insert(element.id.clone());
            }
        }
        tracing::debug!(
            auto = self.state.animated_element_ids.len(),
            pending = self.pending(slide).len(),
            "slide entered"
        );
    }

    /// Enabled click-gated elements not yet revealed, in reveal order.
    pub fn pending<'s>(&self, slide: &'s Slide) -> Vec<&'s ElementData> {
        slide
            .click_sequence()
            .into_iter()
            .filter(|e| e.is_click_gated() && !self.state.animated_element_ids.contains(&e.id))
            .collect()
    }

    /// Handle a click or tap on the active slide.
    ///
    /// Presets are checked on entry, so the only start failure left here is a node unmounted
    /// since then. Such elements are marked done and skipped so they never block the sequence.
    #[tracing::instrument(skip(self, ctx, slide), fields(slide = %slide.id))]
    pub fn advance(&mut self, ctx: &PlaybackCtx<'_>, slide: &Slide) -> AdvanceOutcome {
        if self.slide_index.is_none() {
            return AdvanceOutcome::NavigateNext;
        }
        for element in self.pending(slide) {
            self.state.animated_element_ids.insert(element.id.clone());
            if self.start(ctx, element).is_ok() {
                self.state.click_count += 1;
                return AdvanceOutcome::Revealed(element.id.clone());
            }
        }
        AdvanceOutcome::NavigateNext
    }

    /// Stop the animation driving `element_id`, if any. Its node is left where it stopped.
    pub fn release(&mut self, element_id: &str) {
        self.running.retain(|(id, handle)| {
            if id == element_id {
                handle.cancel();
            }
            id != element_id && handle.is_running()
        });
    }

    fn start(&mut self, ctx: &PlaybackCtx<'_>, element: &ElementData) -> MotionResult<()> {
        let staged = stage_configured(ctx, element).inspect_err(|err| {
            log_declined(&element.id, err);
        })?;

        staged.reset_and_setup();
        {
            let mut node = staged.target.node.borrow_mut();
            node.set_visible(true);
            node.set_hit_testable(true);
        }
        let handle = staged.play(ctx.scheduler, || {});
        self.running.retain(|(_, h)| h.is_running());
        self.running.push((element.id.clone(), handle));
        Ok(())
    }
}

fn stage_configured(ctx: &PlaybackCtx<'_>, element: &ElementData) -> MotionResult<Staged> {
    let preset_id = element
        .active_animation()
        .map(|a| a.preset.as_str())
        .unwrap_or_default();
    stage(ctx, element, preset_id)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/presentation.rs"]
mod tests;
