use std::f64::consts::PI;

/// Curve mapping linear progress to eased progress.
///
/// Both endpoints are exact: `apply(0) == 0` and `apply(1) == 1` for every curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    /// `1 - (1 - t)^3`.
    OutCubic,
    /// Smoothstep, `t^2 (3 - 2t)`.
    InOut,
    /// Damped oscillation settling on 1.
    OutElastic,
    /// Overshoots past 1 before settling.
    OutBack,
}

const BACK_C1: f64 = 1.70158;
const BACK_C3: f64 = BACK_C1 + 1.0;
const ELASTIC_C4: f64 = (2.0 * PI) / 3.0;

impl Ease {
    /// Eased value of `t`, clamped to `[0, 1]` first.
    ///
    /// `OutElastic` and `OutBack` leave `[0, 1]` between the endpoints.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOut => t * t * (3.0 - 2.0 * t),
            Self::OutElastic => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    2f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * ELASTIC_C4).sin() + 1.0
                }
            }
            Self::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
