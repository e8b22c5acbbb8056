//! Engine facade used by the editor and the presentation viewer.

use crate::animation::preset::PresetRegistry;
use crate::deck::{ClickStep, Deck, ElementAnimationConfig};
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::SceneGraph;
use crate::scheduler::Scheduler;
use crate::sequence::PlaybackCtx;
use crate::sequence::presentation::{AdvanceOutcome, Presenter, SequenceState};
use crate::sequence::preview::Previewer;

/// Engine tuning knobs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineOpts {
    /// Delay between a preview finishing and the element snapping back.
    pub preview_reset_delay_ms: f64,
    /// Floor for non-positive or non-finite durations.
    pub min_duration_ms: f64,
    /// Frame spacing used by headless playback.
    pub frame_interval_ms: f64,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            preview_reset_delay_ms: 200.0,
            min_duration_ms: 1.0,
            frame_interval_ms: 1000.0 / 60.0,
        }
    }
}

impl EngineOpts {
    pub fn validate(&self) -> MotionResult<()> {
        let fields = [
            ("previewResetDelayMs", self.preview_reset_delay_ms),
            ("minDurationMs", self.min_duration_ms),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(MotionError::validation(format!(
                    "{name} must be a finite non-negative number"
                )));
            }
        }
        if !self.frame_interval_ms.is_finite() || self.frame_interval_ms <= 0.0 {
            return Err(MotionError::validation(
                "frameIntervalMs must be a finite positive number",
            ));
        }
        Ok(())
    }
}

macro_rules! playback_ctx {
    ($engine:expr) => {
        PlaybackCtx {
            scheduler: &$engine.scheduler,
            registry: &$engine.registry,
            scene: &$engine.scene,
            opts: &$engine.opts,
        }
    };
}

/// Owns the deck data, the scene lookup, the scheduler and both sequencers.
///
/// Every entry point is fail-soft: failures are logged and returned, the engine stays usable.
pub struct MotionEngine<S: SceneGraph> {
    deck: Deck,
    scene: S,
    scheduler: Scheduler,
    registry: PresetRegistry,
    opts: EngineOpts,
    previewer: Previewer,
    presenter: Presenter,
}

impl<S: SceneGraph> MotionEngine<S> {
    /// Build an engine after checking `opts`.
    pub fn new(deck: Deck, scene: S, opts: EngineOpts) -> MotionResult<Self> {
        Self::with_scheduler(deck, scene, Scheduler::new(), opts)
    }

    /// Engine sharing a scheduler the host already drives.
    pub fn with_scheduler(
        deck: Deck,
        scene: S,
        scheduler: Scheduler,
        opts: EngineOpts,
    ) -> MotionResult<Self> {
        opts.validate()?;
        Ok(Self {
            deck,
            scene,
            scheduler,
            registry: PresetRegistry::builtin(),
            opts,
            previewer: Previewer::new(),
            presenter: Presenter::new(),
        })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn opts(&self) -> &EngineOpts {
        &self.opts
    }

    pub fn previewer(&self) -> &Previewer {
        &self.previewer
    }

    /// Forward the host's frame clock.
    pub fn tick(&self, now_ms: f64) {
        self.scheduler.tick(now_ms);
    }

    /// One-shot preview of `preset_id` on an element while editing.
    ///
    /// A presentation animation on the same element is stopped once the preview starts.
    #[tracing::instrument(skip(self))]
    pub fn preview_animation(&mut self, element_id: &str, preset_id: &str) -> MotionResult<()> {
        let Some(element) = self.deck.element(element_id) else {
            let err = MotionError::element_not_found(element_id);
            tracing::warn!(%err, "preview skipped");
            return Err(err);
        };
        let ctx = playback_ctx!(self);
        self.previewer.preview(&ctx, element, preset_id)?;
        self.presenter.release(element_id);
        Ok(())
    }

    /// Persist an element's animation config. Pure data write; nothing plays.
    #[tracing::instrument(skip(self, config), fields(preset = %config.preset))]
    pub fn apply_animation_config(
        &mut self,
        element_id: &str,
        config: ElementAnimationConfig,
    ) -> MotionResult<()> {
        let kind = self
            .deck
            .element(element_id)
            .map(|e| e.kind)
            .ok_or_else(|| MotionError::element_not_found(element_id))?;
        let preset = self.registry.lookup(&config.preset)?;
        self.registry
            .ensure_applicable(preset, kind)
            .inspect_err(|err| tracing::info!(%err, "animation config declined"))?;
        self.deck.apply_animation_config(element_id, config)
    }

    pub fn remove_animation(&mut self, element_id: &str) -> MotionResult<()> {
        self.deck.remove_animation(element_id).map(|_| ())
    }

    pub fn reorder_click_sequence(
        &mut self,
        slide_index: usize,
        ordered_ids: &[&str],
    ) -> MotionResult<()> {
        self.deck.reorder_click_sequence(slide_index, ordered_ids)
    }

    pub fn move_click_order(&mut self, element_id: &str, step: ClickStep) -> MotionResult<bool> {
        self.deck.move_click_order(element_id, step)
    }

    /// Make `slide_index` the active slide and run its entry pass.
    ///
    /// Running previews are reverted first so their timers never touch a presented node.
    #[tracing::instrument(skip(self))]
    pub fn on_slide_entered(&mut self, slide_index: usize) -> MotionResult<()> {
        let slide = self.deck.slide(slide_index).inspect_err(|err| {
            tracing::warn!(%err, "slide entry skipped");
        })?;
        self.previewer.revert_all(&self.scheduler);
        let ctx = playback_ctx!(self);
        self.presenter.enter_slide(&ctx, slide_index, slide);
        Ok(())
    }

    /// Click/tap on the presented slide: reveal the next gated element, or report that the
    /// click should navigate.
    #[tracing::instrument(skip(self))]
    pub fn on_advance_requested(&mut self) -> AdvanceOutcome {
        let Some(slide) = self
            .presenter
            .slide_index()
            .and_then(|i| self.deck.slides.get(i))
        else {
            return AdvanceOutcome::NavigateNext;
        };
        let ctx = playback_ctx!(self);
        self.presenter.advance(&ctx, slide)
    }

    /// Reveal on click, or move to the next slide when nothing is pending.
    pub fn handle_click(&mut self) -> AdvanceOutcome {
        let outcome = self.on_advance_requested();
        if !outcome.consumed() {
            self.next_slide();
        }
        outcome
    }

    pub fn current_slide(&self) -> Option<usize> {
        self.presenter.slide_index()
    }

    pub fn sequence_state(&self) -> &SequenceState {
        self.presenter.state()
    }

    /// Enter the following slide. Returns `false` on the last slide.
    pub fn next_slide(&mut self) -> bool {
        let next = self.current_slide().map_or(0, |i| i + 1);
        next < self.deck.slide_count() && self.on_slide_entered(next).is_ok()
    }

    /// Enter the preceding slide. Returns `false` on the first slide.
    pub fn previous_slide(&mut self) -> bool {
        match self.current_slide() {
            Some(i) if i > 0 => self.on_slide_entered(i - 1).is_ok(),
            _ => false,
        }
    }

    /// Stop all playback; the engine can be reused afterwards.
    pub fn close(&mut self) {
        self.presenter.teardown();
        self.previewer.cancel_all(&self.scheduler);
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
