use super::*;
use crate::foundation::core::AnimProperty;
use crate::scene::MemoryNode;
use std::cell::Cell;

fn node_with(f: impl FnOnce(&mut MemoryNode)) -> (Rc<RefCell<MemoryNode>>, NodeHandle) {
    let mut node = MemoryNode::default();
    f(&mut node);
    let typed = Rc::new(RefCell::new(node));
    let handle: NodeHandle = typed.clone();
    (typed, handle)
}

fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    (count, move || c.set(c.get() + 1))
}

fn ascend_specs() -> Vec<PropertySpec> {
    vec![
        PropertySpec {
            property: AnimProperty::Y,
            from: 350.0,
            to: 300.0,
        },
        PropertySpec {
            property: AnimProperty::Opacity,
            from: 0.0,
            to: 1.0,
        },
    ]
}

#[test]
fn interpolates_with_eased_progress() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start(&s, node, ascend_specs(), 1000.0, Ease::OutCubic, on_done);

    s.tick(500.0);
    let eased = 1.0 - (1.0f64 - 0.5).powi(3);
    let y = typed.borrow().pose.y;
    assert!((y - (350.0 + (300.0 - 350.0) * eased)).abs() < 1e-9);
    assert!((typed.borrow().pose.opacity - eased).abs() < 1e-9);
    assert_eq!(handle.progress(), 0.5);
    assert_eq!(done.get(), 0);

    s.tick(1000.0);
    assert_eq!(typed.borrow().pose.y, 300.0);
    assert_eq!(typed.borrow().pose.opacity, 1.0);
    assert_eq!(handle.status(), PlaybackStatus::Completed);
    assert_eq!(done.get(), 1);
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn progress_is_monotonic_and_reaches_one_once() {
    let s = Scheduler::new();
    let (_, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start(&s, node, ascend_specs(), 300.0, Ease::OutElastic, on_done);

    let mut last = 0.0;
    // Uneven frame spacing: duration is wall-clock, not frame count.
    for t in [7.0, 40.0, 41.0, 120.0, 250.0, 299.0, 333.0, 400.0, 500.0] {
        s.tick(t);
        let p = handle.progress();
        assert!(p >= last);
        last = p;
    }
    assert_eq!(last, 1.0);
    // Evaluations stop at the frame that reached 1.0 (t = 333).
    assert_eq!(handle.evaluations(), 7);
    assert_eq!(done.get(), 1);
}

#[test]
fn one_repaint_per_frame() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    start(&s, node, ascend_specs(), 100.0, Ease::Linear, || {});
    s.run_until(100.0, 25.0);
    assert_eq!(typed.borrow().repaints, 4);
}

#[test]
fn zero_duration_completes_on_first_frame() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start(&s, node, ascend_specs(), 0.0, Ease::OutBack, on_done);
    assert_eq!(done.get(), 0);
    s.tick(16.0);
    assert_eq!(done.get(), 1);
    assert_eq!(handle.evaluations(), 1);
    assert_eq!(typed.borrow().pose.y, 300.0);

    let (_, node) = node_with(|_| {});
    let nan = start(&s, node, ascend_specs(), f64::NAN, Ease::Linear, || {});
    s.tick(32.0);
    assert_eq!(nan.status(), PlaybackStatus::Completed);
}

#[test]
fn cancel_is_idempotent_and_suppresses_completion() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start(&s, node, ascend_specs(), 1000.0, Ease::Linear, on_done);
    s.tick(250.0);
    let y_at_cancel = typed.borrow().pose.y;

    handle.cancel();
    handle.cancel();
    s.run_until(2000.0, 16.0);
    assert_eq!(handle.status(), PlaybackStatus::Cancelled);
    assert_eq!(done.get(), 0);
    // No auto-revert on cancel.
    assert_eq!(typed.borrow().pose.y, y_at_cancel);
    assert_eq!(s.pending_tasks(), 0);
}

#[test]
fn cancel_after_completion_is_a_no_op() {
    let s = Scheduler::new();
    let (_, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start(&s, node, ascend_specs(), 10.0, Ease::Linear, on_done);
    s.tick(20.0);
    handle.cancel();
    handle.clone().cancel();
    assert_eq!(handle.status(), PlaybackStatus::Completed);
    assert_eq!(done.get(), 1);
}

#[test]
fn typewriter_reveals_one_character_per_interval() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|n| n.text = Some(String::new()));
    let (done, on_done) = counter();
    let handle = start_typewriter(&s, node, "Hi!", 300.0, on_done);

    s.tick(99.0);
    assert_eq!(typed.borrow().text.as_deref(), Some(""));
    s.tick(100.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("H"));
    s.tick(200.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("Hi"));
    assert_eq!(done.get(), 0);
    s.tick(300.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("Hi!"));
    assert_eq!(done.get(), 1);
    assert_eq!(handle.status(), PlaybackStatus::Completed);
    assert_eq!(s.pending_tasks(), 0);

    s.tick(1000.0);
    assert_eq!(handle.evaluations(), 3);
}

#[test]
fn typewriter_counts_graphemes_not_bytes() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    start_typewriter(&s, node, "né🙂", 30.0, || {});
    s.tick(20.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("né"));
    s.tick(30.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("né🙂"));
}

#[test]
fn typewriter_cancel_clears_the_interval() {
    let s = Scheduler::new();
    let (typed, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start_typewriter(&s, node, "Hello", 500.0, on_done);
    s.tick(250.0);
    handle.cancel();
    handle.cancel();
    assert_eq!(s.pending_tasks(), 0);
    s.tick(1000.0);
    assert_eq!(typed.borrow().text.as_deref(), Some("He"));
    assert_eq!(done.get(), 0);
}

#[test]
fn empty_typewriter_completes_next_turn() {
    let s = Scheduler::new();
    let (_, node) = node_with(|_| {});
    let (done, on_done) = counter();
    let handle = start_typewriter(&s, node, "", 300.0, on_done);
    assert_eq!(done.get(), 0);
    s.tick(0.0);
    assert_eq!(done.get(), 1);
    assert_eq!(handle.progress(), 1.0);
}
