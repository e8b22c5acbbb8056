use crate::animation::preset::{AnimationPreset, PresetOptions, PresetPlayback, ProcedureKind};
use crate::animation::tween::{self, CancelHandle};
use crate::foundation::core::OriginalState;
use crate::scene::{NodeHandle, apply_pose};
use crate::scheduler::Scheduler;

/// A node together with the persisted state its animation returns to.
#[derive(Clone)]
pub struct Target {
    pub node: NodeHandle,
    pub original: OriginalState,
    /// Persisted text, revealed by the typewriter.
    pub text: Option<String>,
}

impl Target {
    /// Put the node back to its persisted pose and text.
    pub fn restore(&self) {
        let mut node = self.node.borrow_mut();
        apply_pose(&mut *node, &self.original);
        if let Some(text) = &self.text {
            node.set_text(text);
        }
        node.request_repaint();
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("original", &self.original)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Move the node into the preset's pre-animation state.
pub fn setup(preset: &AnimationPreset, target: &Target, options: PresetOptions) {
    let mut node = target.node.borrow_mut();
    match preset.playback {
        PresetPlayback::Tween(recipe) => {
            apply_pose(&mut *node, &recipe.setup_pose(&target.original, options));
        }
        PresetPlayback::Procedure(ProcedureKind::Typewriter) => node.set_text(""),
    }
    node.request_repaint();
}

/// Animate from the setup state back to the original state.
pub fn play(
    scheduler: &Scheduler,
    preset: &AnimationPreset,
    target: &Target,
    options: PresetOptions,
    duration_ms: f64,
    on_complete: impl FnOnce() + 'static,
) -> CancelHandle {
    match preset.playback {
        PresetPlayback::Tween(recipe) => tween::start(
            scheduler,
            target.node.clone(),
            recipe.property_specs(&target.original, options),
            duration_ms,
            recipe.ease,
            on_complete,
        ),
        PresetPlayback::Procedure(ProcedureKind::Typewriter) => tween::start_typewriter(
            scheduler,
            target.node.clone(),
            target.text.as_deref().unwrap_or_default(),
            duration_ms,
            on_complete,
        ),
    }
}
