//! Playback policies on top of the tween runner.
//!
//! [`preview`] plays one element at a time while editing and reverts it afterwards.
//! [`presentation`] drives a whole slide: automatic elements on entry, click-gated elements one
//! per click in click order.

pub mod presentation;
pub mod preview;

use crate::animation::playback::{self, Target};
use crate::animation::preset::{AnimationPreset, PresetOptions, PresetRegistry};
use crate::animation::tween::CancelHandle;
use crate::deck::{ElementData, resolve_original_state};
use crate::engine::EngineOpts;
use crate::foundation::error::{MotionError, MotionResult};
use crate::scene::SceneGraph;
use crate::scheduler::Scheduler;

/// Collaborators a sequencer needs for one call.
#[derive(Clone, Copy)]
pub struct PlaybackCtx<'a> {
    pub scheduler: &'a Scheduler,
    pub registry: &'a PresetRegistry,
    pub scene: &'a dyn SceneGraph,
    pub opts: &'a EngineOpts,
}

/// One element's animation, resolved and checked without touching the node.
pub(crate) struct Staged {
    pub(crate) preset: &'static AnimationPreset,
    pub(crate) target: Target,
    pub(crate) options: PresetOptions,
    pub(crate) duration_ms: f64,
}

/// Resolve preset, applicability, node and original state for `element`.
///
/// Fails without side effects, so callers can decline before cancelling anything.
pub(crate) fn stage(
    ctx: &PlaybackCtx<'_>,
    element: &ElementData,
    preset_id: &str,
) -> MotionResult<Staged> {
    let preset = ctx.registry.lookup(preset_id)?;
    ctx.registry.ensure_applicable(preset, element.kind)?;
    let node = ctx
        .scene
        .find_node(&element.id)
        .ok_or_else(|| MotionError::node_not_found(&element.id))?;

    let config = element.animation.as_ref();
    let duration_secs = config.map_or(preset.default_duration_secs, |c| c.duration_secs);
    let options = config.map(|c| c.options()).unwrap_or_default();
    let text = element.text.clone().or_else(|| node.borrow().text());

    Ok(Staged {
        preset,
        target: Target {
            node,
            original: resolve_original_state(element),
            text,
        },
        options,
        duration_ms: preset.effective_duration_ms(duration_secs, ctx.opts.min_duration_ms),
    })
}

impl Staged {
    /// Snap to the original state, then into the preset's setup state.
    pub(crate) fn reset_and_setup(&self) {
        self.target.restore();
        playback::setup(self.preset, &self.target, self.options);
    }

    pub(crate) fn play(
        &self,
        scheduler: &Scheduler,
        on_complete: impl FnOnce() + 'static,
    ) -> CancelHandle {
        tracing::debug!(
            preset = self.preset.id,
            duration_ms = self.duration_ms,
            "starting playback"
        );
        playback::play(
            scheduler,
            self.preset,
            &self.target,
            self.options,
            self.duration_ms,
            on_complete,
        )
    }
}

/// Log a failed playback the way the editor expects: applicability as a notice, the rest as
/// benign races.
pub(crate) fn log_declined(element_id: &str, err: &MotionError) {
    if err.is_user_facing() {
        tracing::info!(element = element_id, %err, "animation declined");
    } else {
        tracing::warn!(element = element_id, %err, "animation skipped");
    }
}
