use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MotionError::preset_not_found("spin")
            .to_string()
            .contains("preset not found: spin")
    );
    assert!(
        MotionError::not_applicable("typewriter", "rect")
            .to_string()
            .contains("preset not applicable:")
    );
    assert!(
        MotionError::node_not_found("n1")
            .to_string()
            .contains("node not found:")
    );
    assert!(
        MotionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MotionError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_applicability_is_user_facing() {
    assert!(MotionError::not_applicable("typewriter", "image").is_user_facing());
    assert!(!MotionError::preset_not_found("x").is_user_facing());
    assert!(!MotionError::node_not_found("x").is_user_facing());
    assert!(!MotionError::element_not_found("x").is_user_facing());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MotionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: MotionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, MotionError::Serde(_)));
}
