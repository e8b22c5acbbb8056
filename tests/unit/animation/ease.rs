use super::*;

const CURVES: [Ease; 5] = [
    Ease::Linear,
    Ease::OutCubic,
    Ease::InOut,
    Ease::OutElastic,
    Ease::OutBack,
];

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn every_curve_starts_at_zero_and_lands_on_one() {
    for ease in CURVES {
        assert!(close(ease.apply(0.0), 0.0), "{ease:?} at 0");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
    }
}

#[test]
fn non_overshooting_curves_rise() {
    for ease in [Ease::Linear, Ease::OutCubic, Ease::InOut] {
        let samples: Vec<f64> = (0..=20).map(|i| ease.apply(f64::from(i) / 20.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] < w[1]), "{ease:?}");
    }
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-3.0), 0.0);
    assert_eq!(Ease::OutBack.apply(7.0), 1.0);
    assert_eq!(Ease::OutElastic.apply(f64::INFINITY), 1.0);
}

#[test]
fn out_curves_follow_their_closed_forms() {
    let t: f64 = 0.3;
    assert!(close(Ease::OutCubic.apply(t), 0.657));
    assert!(close(
        Ease::OutBack.apply(t),
        1.0 + 2.70158 * (t - 1.0).powi(3) + 1.70158 * (t - 1.0).powi(2)
    ));
    assert!(close(
        Ease::OutElastic.apply(t),
        2f64.powf(-3.0) * (2.25 * (2.0 * PI / 3.0)).sin() + 1.0
    ));
    assert!(close(Ease::InOut.apply(0.5), 0.5));
    assert!(close(Ease::InOut.apply(0.25), 0.15625));
}

#[test]
fn elastic_and_back_overshoot() {
    assert!((1..100).any(|i| Ease::OutBack.apply(f64::from(i) / 100.0) > 1.0));
    assert!((1..100).any(|i| Ease::OutElastic.apply(f64::from(i) / 100.0) > 1.0));
}

#[test]
fn curves_serialize_by_name() {
    assert_eq!(serde_json::to_string(&Ease::OutElastic).unwrap(), "\"outElastic\"");
    let ease: Ease = serde_json::from_str("\"inOut\"").unwrap();
    assert_eq!(ease, Ease::InOut);
    assert!(serde_json::from_str::<Ease>("\"inQuad\"").is_err());
}
