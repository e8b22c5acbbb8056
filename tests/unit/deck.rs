use super::*;

fn rect(id: &str) -> ElementData {
    ElementData::new(id, ElementKind::Rect, 10.0, 20.0)
}

fn deck() -> Deck {
    Deck::new(vec![
        Slide::new("s0", vec![rect("a"), rect("b"), rect("c"), rect("d")]),
        Slide::new("s1", vec![rect("e")]),
    ])
}

fn orders(deck: &Deck, slide: usize) -> Vec<(String, Option<u32>)> {
    deck.slides[slide]
        .elements
        .iter()
        .map(|e| (e.id.clone(), e.click_order()))
        .collect()
}

#[test]
fn original_state_fills_defaults_once() {
    let mut el = rect("a");
    el.opacity = Some(0.4);
    let state = resolve_original_state(&el);
    assert_eq!(state.x, 10.0);
    assert_eq!(state.y, 20.0);
    assert_eq!(state.scale_x, 1.0);
    assert_eq!(state.scale_y, 1.0);
    assert_eq!(state.opacity, 0.4);
    assert_eq!(state.rotation, 0.0);
}

#[test]
fn click_orders_are_assigned_max_plus_one() {
    let mut deck = deck();
    deck.apply_animation_config("a", ElementAnimationConfig::new("ascend", 0.5).on_click())
        .unwrap();
    deck.apply_animation_config("c", ElementAnimationConfig::new("merge", 0.5).on_click())
        .unwrap();
    deck.apply_animation_config("b", ElementAnimationConfig::new("shift", 0.5))
        .unwrap();
    assert_eq!(
        orders(&deck, 0),
        [
            ("a".to_owned(), Some(1)),
            ("b".to_owned(), None),
            ("c".to_owned(), Some(2)),
            ("d".to_owned(), None),
        ]
    );
    // Orders are scoped to a slide.
    deck.apply_animation_config("e", ElementAnimationConfig::new("ascend", 0.5).on_click())
        .unwrap();
    assert_eq!(deck.element("e").unwrap().click_order(), Some(1));
}

#[test]
fn reapplying_keeps_the_existing_order() {
    let mut deck = deck();
    for id in ["a", "b"] {
        deck.apply_animation_config(id, ElementAnimationConfig::new("ascend", 0.5).on_click())
            .unwrap();
    }
    deck.apply_animation_config("a", ElementAnimationConfig::new("burst", 1.0).on_click())
        .unwrap();
    assert_eq!(deck.element("a").unwrap().click_order(), Some(1));
    assert_eq!(deck.animation_config("a").unwrap().preset, "burst");
}

#[test]
fn colliding_explicit_order_is_reassigned() {
    let mut deck = deck();
    deck.apply_animation_config("a", ElementAnimationConfig::new("ascend", 0.5).with_click_order(3))
        .unwrap();
    deck.apply_animation_config("b", ElementAnimationConfig::new("ascend", 0.5).with_click_order(3))
        .unwrap();
    assert_eq!(deck.element("a").unwrap().click_order(), Some(3));
    assert_eq!(deck.element("b").unwrap().click_order(), Some(4));
    assert_eq!(deck.slides[0].max_click_order(), 4);
    assert_eq!(deck.slides[1].max_click_order(), 0);
}

#[test]
fn turning_gating_off_clears_the_order() {
    let mut deck = deck();
    deck.apply_animation_config("a", ElementAnimationConfig::new("ascend", 0.5).on_click())
        .unwrap();
    deck.apply_animation_config("a", ElementAnimationConfig::new("ascend", 0.5))
        .unwrap();
    assert_eq!(deck.animation_config("a").unwrap().click_order, None);
}

#[test]
fn remove_compacts_the_sequence() {
    let mut deck = deck();
    for id in ["a", "b", "c"] {
        deck.apply_animation_config(id, ElementAnimationConfig::new("ascend", 0.5).on_click())
            .unwrap();
    }
    let removed = deck.remove_animation("b").unwrap();
    assert_eq!(removed.unwrap().click_order, Some(2));
    assert_eq!(deck.element("a").unwrap().click_order(), Some(1));
    assert_eq!(deck.element("c").unwrap().click_order(), Some(2));
    assert!(deck.animation_config("b").is_none());
}

#[test]
fn reorder_and_move() {
    let mut deck = deck();
    for id in ["a", "b", "c"] {
        deck.apply_animation_config(id, ElementAnimationConfig::new("ascend", 0.5).on_click())
            .unwrap();
    }
    deck.reorder_click_sequence(0, &["c", "a", "b"]).unwrap();
    let seq: Vec<_> = deck.slides[0]
        .click_sequence()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(seq, ["c", "a", "b"]);

    assert!(deck.move_click_order("b", ClickStep::Earlier).unwrap());
    assert!(!deck.move_click_order("c", ClickStep::Earlier).unwrap());
    let seq: Vec<_> = deck.slides[0]
        .click_sequence()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(seq, ["c", "b", "a"]);

    assert!(deck.reorder_click_sequence(0, &["c", "a"]).is_err());
    assert!(deck.reorder_click_sequence(0, &["c", "a", "a"]).is_err());
    assert!(deck.move_click_order("d", ClickStep::Later).is_err());
}

#[test]
fn click_sequence_is_stable_for_ties_and_zero() {
    let mut deck = deck();
    let gate = |order| {
        let mut c = ElementAnimationConfig::new("ascend", 0.5).on_click();
        c.click_order = Some(order);
        c
    };
    // Write duplicate/zero orders directly: the editor never produces them, old data might.
    deck.slides[0].elements[0].animation = Some(gate(2));
    deck.slides[0].elements[1].animation = Some(gate(0));
    deck.slides[0].elements[2].animation = Some(gate(2));
    let seq: Vec<_> = deck.slides[0]
        .click_sequence()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(seq, ["b", "a", "c"]);
    assert!(deck.validate(&PresetRegistry::builtin()).is_err());
}

#[test]
fn validate_accepts_editor_output() {
    let mut deck = deck();
    deck.apply_animation_config("a", ElementAnimationConfig::new("ascend", 0.5).on_click())
        .unwrap();
    deck.apply_animation_config("b", ElementAnimationConfig::new("bounce", 0.5))
        .unwrap();
    deck.validate(&PresetRegistry::builtin()).unwrap();

    deck.slides[1].elements[0].animation = Some(ElementAnimationConfig::new("typewriter", 1.0));
    let err = deck.validate(&PresetRegistry::builtin()).unwrap_err();
    assert!(err.is_user_facing());
}

#[test]
fn unknown_elements_and_slides_are_errors() {
    let mut deck = deck();
    assert!(matches!(
        deck.apply_animation_config("zz", ElementAnimationConfig::new("ascend", 0.5)),
        Err(MotionError::ElementNotFound(_))
    ));
    assert!(matches!(
        deck.slide(9),
        Err(MotionError::SlideOutOfRange { index: 9, len: 2 })
    ));
    assert_eq!(deck.slide_of("e"), Some(1));
}

#[test]
fn json_uses_editor_field_names() {
    let json = r#"{
        "title": "Pitch",
        "slides": [{
            "id": "s0",
            "elements": [{
                "id": "t1", "type": "text", "x": 5, "y": 6, "scaleX": 2,
                "text": "Hi!",
                "animation": {"type": "typewriter", "duration": 0.3,
                              "appearOnClick": true, "clickOrder": 1}
            }]
        }]
    }"#;
    let deck = Deck::from_json(json).unwrap();
    let el = deck.element("t1").unwrap();
    assert_eq!(el.kind, ElementKind::Text);
    assert_eq!(el.scale_x, Some(2.0));
    let config = el.animation.as_ref().unwrap();
    assert!(config.enabled);
    assert_eq!(config.click_order, Some(1));
    assert_eq!(config.direction, Direction::Left);

    let back = Deck::from_json(&deck.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, deck);
}
