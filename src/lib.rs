//! deckmotion drives per-element entrance animations on slide canvases.
//!
//! - [`PresetRegistry`]: the static table of named presets (`ascend`, `bounce`, `typewriter`...)
//! - [`animation::tween`]: frame-driven property tweens and the typewriter procedure, each
//!   returning a [`CancelHandle`]
//! - [`Previewer`] and [`Presenter`]: the editing-time and viewing-time sequencers
//! - [`MotionEngine`]: the facade the editor and the viewer call into
//!
//! Playback is single-threaded and cooperative. The host owns the clock and calls
//! [`Scheduler::tick`] (or [`MotionEngine::tick`]) once per display refresh.
#![forbid(unsafe_code)]

pub mod animation;
pub mod deck;
pub mod engine;
pub mod foundation;
pub mod scene;
pub mod scheduler;
pub mod sequence;

pub use crate::animation::ease::Ease;
pub use crate::animation::preset::{
    AnimationPreset, Applicability, Direction, PresetOptions, PresetPlayback, PresetRegistry,
    ProcedureKind, PropertySpec, TweenRecipe,
};
pub use crate::animation::tween::{CancelHandle, PlaybackStatus};
pub use crate::deck::{
    ClickStep, Deck, ElementAnimationConfig, ElementData, Slide, resolve_original_state,
};
pub use crate::engine::{EngineOpts, MotionEngine};
pub use crate::foundation::core::{AnimProperty, ElementKind, OriginalState, Pose};
pub use crate::foundation::error::{MotionError, MotionResult};
pub use crate::scene::{MemoryNode, MemoryScene, NodeHandle, RenderNode, SceneGraph};
pub use crate::scheduler::{Scheduler, TaskId};
pub use crate::sequence::PlaybackCtx;
pub use crate::sequence::presentation::{AdvanceOutcome, Presenter, SequenceState};
pub use crate::sequence::preview::{PlaybackSession, Previewer};
