//! Built-in entrance presets.
//!
//! Each preset declares which elements it applies to, a default duration, a setup pose (the
//! state a node is put in before playback) and a playback strategy. The table is static and
//! read-only; [`PresetRegistry`] is the lookup surface.

use crate::animation::ease::Ease;
use crate::foundation::core::{AnimProperty, ElementKind, OriginalState, Pose};
use crate::foundation::error::{MotionError, MotionResult};

/// Which element kinds a preset can animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Applicability {
    AllElements,
    TextOnly,
}

/// Side an element enters from (used by `shift`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

/// Per-element options that parameterize a preset's setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresetOptions {
    pub direction: Direction,
}

/// Property tween from a setup pose back to the original state.
#[derive(Clone, Copy, Debug)]
pub struct TweenRecipe {
    pub setup: fn(&OriginalState, PresetOptions) -> Pose,
    pub properties: &'static [AnimProperty],
    pub ease: Ease,
    /// Multiplier applied to the configured duration.
    pub duration_factor: f64,
}

/// One interpolated property: written as `from + (to - from) * ease(progress)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertySpec {
    pub property: AnimProperty,
    pub from: f64,
    pub to: f64,
}

impl TweenRecipe {
    pub fn setup_pose(&self, original: &OriginalState, options: PresetOptions) -> Pose {
        (self.setup)(original, options)
    }

    pub fn property_specs(
        &self,
        original: &OriginalState,
        options: PresetOptions,
    ) -> Vec<PropertySpec> {
        let from = self.setup_pose(original, options);
        self.properties
            .iter()
            .map(|&property| PropertySpec {
                property,
                from: from.get(property),
                to: original.get(property),
            })
            .collect()
    }
}

/// Time-driven procedures that are not expressible as a property tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcedureKind {
    /// Reveal the text one grapheme per `duration / len`.
    Typewriter,
}

#[derive(Clone, Copy, Debug)]
pub enum PresetPlayback {
    Tween(TweenRecipe),
    Procedure(ProcedureKind),
}

#[derive(Clone, Copy, Debug)]
pub struct AnimationPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub applicability: Applicability,
    pub default_duration_secs: f64,
    pub playback: PresetPlayback,
}

impl AnimationPreset {
    pub fn is_applicable_to(&self, kind: ElementKind) -> bool {
        match self.applicability {
            Applicability::AllElements => true,
            Applicability::TextOnly => kind.is_text(),
        }
    }

    /// Wall-clock duration for a configured duration in seconds.
    ///
    /// Non-finite or non-positive inputs clamp to `min_ms` so playback still completes.
    pub fn effective_duration_ms(&self, duration_secs: f64, min_ms: f64) -> f64 {
        let factor = match self.playback {
            PresetPlayback::Tween(recipe) => recipe.duration_factor,
            PresetPlayback::Procedure(_) => 1.0,
        };
        let ms = duration_secs * 1000.0 * factor;
        if ms.is_finite() && ms >= min_ms {
            ms
        } else {
            min_ms.max(0.0)
        }
    }
}

fn ascend(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        y: o.y + 50.0,
        opacity: 0.0,
        ..*o
    }
}

fn shift(o: &OriginalState, opts: PresetOptions) -> Pose {
    let dx = match opts.direction {
        Direction::Left => -100.0,
        Direction::Right => 100.0,
    };
    Pose {
        x: o.x + dx,
        opacity: 0.0,
        ..*o
    }
}

fn bounce(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        opacity: 0.0,
        ..o.with_uniform_scale(0.3)
    }
}

fn merge(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        opacity: 0.0,
        ..o.with_uniform_scale(0.0)
    }
}

fn block(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        scale_x: 0.0,
        opacity: 0.0,
        ..*o
    }
}

fn burst(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        rotation: o.rotation - 180.0,
        opacity: 0.0,
        ..o.with_uniform_scale(0.1)
    }
}

fn clarify(o: &OriginalState, _: PresetOptions) -> Pose {
    Pose {
        opacity: 0.3,
        ..*o
    }
}

use AnimProperty::{Opacity, Rotation, ScaleX, ScaleY, X, Y};

static BUILTIN: [AnimationPreset; 8] = [
    AnimationPreset {
        id: "ascend",
        label: "Ascend",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.5,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: ascend,
            properties: &[Y, Opacity],
            ease: Ease::OutCubic,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "shift",
        label: "Shift",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.5,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: shift,
            properties: &[X, Opacity],
            ease: Ease::OutCubic,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "bounce",
        label: "Bounce",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.8,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: bounce,
            properties: &[ScaleX, ScaleY, Opacity],
            ease: Ease::OutElastic,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "merge",
        label: "Merge",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.6,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: merge,
            properties: &[ScaleX, ScaleY, Opacity],
            ease: Ease::OutBack,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "block",
        label: "Block",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.5,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: block,
            properties: &[ScaleX, Opacity],
            ease: Ease::InOut,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "burst",
        label: "Burst",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.7,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: burst,
            properties: &[ScaleX, ScaleY, Rotation, Opacity],
            ease: Ease::OutBack,
            duration_factor: 1.0,
        }),
    },
    AnimationPreset {
        id: "clarify",
        label: "Clarify",
        applicability: Applicability::AllElements,
        default_duration_secs: 0.8,
        playback: PresetPlayback::Tween(TweenRecipe {
            setup: clarify,
            properties: &[Opacity],
            ease: Ease::Linear,
            duration_factor: 1.2,
        }),
    },
    AnimationPreset {
        id: "typewriter",
        label: "Typewriter",
        applicability: Applicability::TextOnly,
        default_duration_secs: 1.5,
        playback: PresetPlayback::Procedure(ProcedureKind::Typewriter),
    },
];

/// Read-only lookup over the preset table.
#[derive(Clone, Copy, Debug)]
pub struct PresetRegistry {
    presets: &'static [AnimationPreset],
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetRegistry {
    pub fn builtin() -> Self {
        Self {
            presets: &BUILTIN,
        }
    }

    pub fn lookup(&self, id: &str) -> MotionResult<&'static AnimationPreset> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MotionError::preset_not_found(id))
    }

    /// Reject text-only presets on non-text elements.
    pub fn ensure_applicable(
        &self,
        preset: &AnimationPreset,
        kind: ElementKind,
    ) -> MotionResult<()> {
        if preset.is_applicable_to(kind) {
            Ok(())
        } else {
            Err(MotionError::not_applicable(preset.id, kind.name()))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static AnimationPreset> {
        self.presets.iter()
    }

    /// Presets the editor offers for an element of `kind`.
    pub fn presets_for(&self, kind: ElementKind) -> impl Iterator<Item = &'static AnimationPreset> {
        self.presets.iter().filter(move |p| p.is_applicable_to(kind))
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preset.rs"]
mod tests;
