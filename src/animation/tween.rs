//! Tween runner.
//!
//! A property tween samples wall-clock time once per frame, so its duration holds under any
//! frame rate. The typewriter procedure runs on a fixed interval instead. Both hand back a
//! [`CancelHandle`]; completion callbacks run exactly once and never after a cancel.

use crate::animation::ease::Ease;
use crate::animation::preset::PropertySpec;
use crate::foundation::core::lerp;
use crate::scene::NodeHandle;
use crate::scheduler::{Scheduler, TaskId};
use std::cell::RefCell;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// Continuation invoked once when playback reaches its end.
pub type OnComplete = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Running,
    Completed,
    Cancelled,
}

#[derive(Debug)]
struct HandleState {
    status: PlaybackStatus,
    progress: f64,
    evaluations: u64,
    task: Option<TaskId>,
}

/// Shared handle to a running tween or procedure.
///
/// `cancel` stops scheduling immediately and is a no-op once the playback has completed or was
/// already cancelled. The node keeps whatever values it had; reverting is the caller's job.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    scheduler: Scheduler,
    state: Rc<RefCell<HandleState>>,
}

impl CancelHandle {
    fn new(scheduler: &Scheduler) -> Self {
        Self {
            scheduler: scheduler.clone(),
            state: Rc::new(RefCell::new(HandleState {
                status: PlaybackStatus::Running,
                progress: 0.0,
                evaluations: 0,
                task: None,
            })),
        }
    }

    pub fn cancel(&self) {
        let task = {
            let mut state = self.state.borrow_mut();
            if state.status != PlaybackStatus::Running {
                return;
            }
            state.status = PlaybackStatus::Cancelled;
            state.task.take()
        };
        if let Some(task) = task {
            self.scheduler.cancel(task);
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.borrow().status
    }

    pub fn is_running(&self) -> bool {
        self.status() == PlaybackStatus::Running
    }

    /// Linear progress in `[0, 1]` at the last evaluation.
    pub fn progress(&self) -> f64 {
        self.state.borrow().progress
    }

    /// Frames (tween) or interval firings (procedure) evaluated so far.
    pub fn evaluations(&self) -> u64 {
        self.state.borrow().evaluations
    }

    fn set_task(&self, task: TaskId) {
        self.state.borrow_mut().task = Some(task);
    }

    fn record(&self, progress: f64) {
        let mut state = self.state.borrow_mut();
        state.progress = progress;
        state.evaluations += 1;
    }

    /// Mark completion. Returns `false` if the handle was cancelled meanwhile.
    fn complete(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.status != PlaybackStatus::Running {
            return false;
        }
        state.status = PlaybackStatus::Completed;
        state.task = None;
        true
    }
}

struct TweenState {
    handle: CancelHandle,
    node: NodeHandle,
    specs: Vec<PropertySpec>,
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
    on_complete: Option<OnComplete>,
}

/// Interpolate `specs` on `node` over `duration_ms` of wall-clock time.
///
/// The first evaluation happens on the next frame. A zero duration completes on that frame.
pub fn start(
    scheduler: &Scheduler,
    node: NodeHandle,
    specs: Vec<PropertySpec>,
    duration_ms: f64,
    ease: Ease,
    on_complete: impl FnOnce() + 'static,
) -> CancelHandle {
    let handle = CancelHandle::new(scheduler);
    let state = Rc::new(RefCell::new(TweenState {
        handle: handle.clone(),
        node,
        specs,
        start_ms: scheduler.now_ms(),
        duration_ms: if duration_ms.is_finite() {
            duration_ms.max(0.0)
        } else {
            0.0
        },
        ease,
        on_complete: Some(Box::new(on_complete)),
    }));
    schedule_frame(scheduler, state);
    handle
}

fn schedule_frame(scheduler: &Scheduler, state: Rc<RefCell<TweenState>>) {
    let handle = state.borrow().handle.clone();
    let task = scheduler.request_frame(move |now_ms| on_frame(&state, now_ms));
    handle.set_task(task);
}

fn on_frame(state: &Rc<RefCell<TweenState>>, now_ms: f64) {
    let mut st = state.borrow_mut();
    if !st.handle.is_running() {
        return;
    }

    let progress = if st.duration_ms <= 0.0 {
        1.0
    } else {
        ((now_ms - st.start_ms) / st.duration_ms).clamp(0.0, 1.0)
    };
    let eased = st.ease.apply(progress);
    {
        let mut node = st.node.borrow_mut();
        for spec in &st.specs {
            node.set_property(spec.property, lerp(spec.from, spec.to, eased));
        }
        node.request_repaint();
    }
    st.handle.record(progress);

    if progress >= 1.0 {
        let done = if st.handle.complete() {
            st.on_complete.take()
        } else {
            None
        };
        drop(st);
        if let Some(done) = done {
            done();
        }
    } else {
        let scheduler = st.handle.scheduler.clone();
        drop(st);
        schedule_frame(&scheduler, state.clone());
    }
}

struct TypewriterState {
    handle: CancelHandle,
    node: NodeHandle,
    text: String,
    // Byte offset just past each grapheme.
    ends: Vec<usize>,
    revealed: usize,
    on_complete: Option<OnComplete>,
}

/// Reveal `text` one grapheme every `duration_ms / grapheme_count`.
///
/// The node's text is expected to be cleared by the preset setup. Empty text completes on the
/// next scheduler turn.
pub fn start_typewriter(
    scheduler: &Scheduler,
    node: NodeHandle,
    text: &str,
    duration_ms: f64,
    on_complete: impl FnOnce() + 'static,
) -> CancelHandle {
    let handle = CancelHandle::new(scheduler);
    let ends: Vec<usize> = text
        .grapheme_indices(true)
        .map(|(i, g)| i + g.len())
        .collect();

    if ends.is_empty() {
        let h = handle.clone();
        let task = scheduler.set_timeout(0.0, move || {
            h.record(1.0);
            if h.complete() {
                on_complete();
            }
        });
        handle.set_task(task);
        return handle;
    }

    let interval_ms = duration_ms / ends.len() as f64;
    let state = Rc::new(RefCell::new(TypewriterState {
        handle: handle.clone(),
        node,
        text: text.to_owned(),
        ends,
        revealed: 0,
        on_complete: Some(Box::new(on_complete)),
    }));
    let task = scheduler.set_interval(interval_ms, move || on_interval(&state));
    handle.set_task(task);
    handle
}

fn on_interval(state: &Rc<RefCell<TypewriterState>>) {
    let mut st = state.borrow_mut();
    if !st.handle.is_running() {
        return;
    }

    st.revealed = (st.revealed + 1).min(st.ends.len());
    let shown = st.revealed;
    let total = st.ends.len();
    {
        let end = st.ends[shown - 1];
        let mut node = st.node.borrow_mut();
        node.set_text(&st.text[..end]);
        node.request_repaint();
    }
    st.handle.record(shown as f64 / total as f64);

    if shown < total {
        return;
    }

    let task = st.handle.state.borrow().task;
    let done = if st.handle.complete() {
        st.on_complete.take()
    } else {
        None
    };
    let scheduler = st.handle.scheduler.clone();
    drop(st);
    if let Some(task) = task {
        scheduler.cancel(task);
    }
    if let Some(done) = done {
        done();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
