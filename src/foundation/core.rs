use crate::foundation::error::MotionError;
use std::fmt;
use std::str::FromStr;

/// Animatable numeric property of a renderable node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum AnimProperty {
    X,
    Y,
    ScaleX,
    ScaleY,
    Opacity,
    Rotation,
}

impl AnimProperty {
    /// Every property, in the order poses are written to nodes.
    pub const ALL: [AnimProperty; 6] = [
        Self::X,
        Self::Y,
        Self::ScaleX,
        Self::ScaleY,
        Self::Opacity,
        Self::Rotation,
    ];

    /// Wire name used by the editor data model.
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::Opacity => "opacity",
            Self::Rotation => "rotation",
        }
    }
}

impl fmt::Display for AnimProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Full visual state of a node: position, scale, opacity and rotation (degrees).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub opacity: f64,
    pub rotation: f64,
}

/// Pose snapshot taken from persisted element data before an animation starts.
///
/// Setup and playback always target this snapshot, never the live node, so re-triggering an
/// animation mid-flight cannot drift.
pub type OriginalState = Pose;

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
            rotation: 0.0,
        }
    }
}

impl Pose {
    pub fn get(&self, prop: AnimProperty) -> f64 {
        match prop {
            AnimProperty::X => self.x,
            AnimProperty::Y => self.y,
            AnimProperty::ScaleX => self.scale_x,
            AnimProperty::ScaleY => self.scale_y,
            AnimProperty::Opacity => self.opacity,
            AnimProperty::Rotation => self.rotation,
        }
    }

    pub fn set(&mut self, prop: AnimProperty, value: f64) {
        match prop {
            AnimProperty::X => self.x = value,
            AnimProperty::Y => self.y = value,
            AnimProperty::ScaleX => self.scale_x = value,
            AnimProperty::ScaleY => self.scale_y = value,
            AnimProperty::Opacity => self.opacity = value,
            AnimProperty::Rotation => self.rotation = value,
        }
    }

    /// Copy with both scale axes set to `scale`.
    pub fn with_uniform_scale(mut self, scale: f64) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }
}

/// Kind of canvas element, as stored by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Rect,
    Circle,
    Ellipse,
    Triangle,
    Star,
    Line,
    Arrow,
    Image,
}

impl ElementKind {
    pub const ALL: [ElementKind; 9] = [
        Self::Text,
        Self::Rect,
        Self::Circle,
        Self::Ellipse,
        Self::Triangle,
        Self::Star,
        Self::Line,
        Self::Arrow,
        Self::Image,
    ];

    pub fn is_text(self) -> bool {
        matches!(self, Self::Text)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Star => "star",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| MotionError::validation(format!("unknown element kind '{s}'")))
    }
}

/// Linear interpolation that lands exactly on `b` once `t` reaches 1.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t == 1.0 { b } else { a + (b - a) * t }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
