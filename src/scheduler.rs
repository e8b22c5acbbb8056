//! Host-driven, single-threaded scheduler for frame callbacks and timers.
//!
//! The host calls [`Scheduler::tick`] once per display refresh with its wall clock. Each tick
//! first fires due timers in due-time order (the clock reads each timer's due time while it
//! runs), then runs one frame pass over the frame callbacks registered before the pass.
//! Callbacks never run while the registry is borrowed, so they may register or cancel tasks.

use slotmap::{SlotMap, new_key_type};
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle to a scheduled frame callback or timer.
    pub struct TaskId;
}

/// Smallest interval period; keeps a degenerate interval from spinning inside one tick.
pub const MIN_INTERVAL_MS: f64 = 0.001;

type FrameCallback = Box<dyn FnOnce(f64)>;
type TimeoutCallback = Box<dyn FnOnce()>;
type IntervalCallback = Box<dyn FnMut()>;

enum TaskKind {
    Frame(Option<FrameCallback>),
    Timeout {
        due_ms: f64,
        callback: Option<TimeoutCallback>,
    },
    Interval {
        due_ms: f64,
        period_ms: f64,
        // `None` while the callback is running.
        callback: Option<IntervalCallback>,
    },
}

struct Task {
    seq: u64,
    kind: TaskKind,
}

impl Task {
    fn due_timer(&self) -> Option<f64> {
        match &self.kind {
            TaskKind::Frame(_) => None,
            TaskKind::Timeout { due_ms, .. } => Some(*due_ms),
            TaskKind::Interval {
                due_ms, callback, ..
            } => callback.as_ref().map(|_| *due_ms),
        }
    }
}

#[derive(Default)]
struct SchedulerInner {
    now_ms: f64,
    next_seq: u64,
    frames_run: u64,
    tasks: SlotMap<TaskId, Task>,
}

impl SchedulerInner {
    fn insert(&mut self, kind: TaskKind) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert(Task { seq, kind })
    }

    fn next_due_timer(&self, until_ms: f64) -> Option<(TaskId, f64)> {
        self.tasks
            .iter()
            .filter_map(|(id, task)| {
                let due = task.due_timer()?;
                (due <= until_ms).then_some((id, due, task.seq))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)))
            .map(|(id, due, _)| (id, due))
    }
}

/// Cheaply clonable handle to a shared task registry.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("now_ms", &inner.now_ms)
            .field("pending", &inner.tasks.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler whose clock starts at `now_ms`.
    pub fn starting_at(now_ms: f64) -> Self {
        let s = Self::default();
        s.inner.borrow_mut().now_ms = now_ms;
        s
    }

    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Number of frame passes run so far.
    pub fn frames_run(&self) -> u64 {
        self.inner.borrow().frames_run
    }

    pub fn pending_tasks(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.inner.borrow().tasks.contains_key(id)
    }

    /// Run `callback` on the next frame pass with that frame's timestamp.
    pub fn request_frame(&self, callback: impl FnOnce(f64) + 'static) -> TaskId {
        self.inner
            .borrow_mut()
            .insert(TaskKind::Frame(Some(Box::new(callback))))
    }

    pub fn set_timeout(&self, delay_ms: f64, callback: impl FnOnce() + 'static) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let due_ms = inner.now_ms + delay_ms.max(0.0);
        inner.insert(TaskKind::Timeout {
            due_ms,
            callback: Some(Box::new(callback)),
        })
    }

    /// Fire `callback` every `period_ms` until cancelled; the first call is one period out.
    pub fn set_interval(&self, period_ms: f64, callback: impl FnMut() + 'static) -> TaskId {
        let mut inner = self.inner.borrow_mut();
        let period_ms = if period_ms.is_finite() {
            period_ms.max(MIN_INTERVAL_MS)
        } else {
            MIN_INTERVAL_MS
        };
        let due_ms = inner.now_ms + period_ms;
        inner.insert(TaskKind::Interval {
            due_ms,
            period_ms,
            callback: Some(Box::new(callback)),
        })
    }

    /// Remove a task. Returns `false` if it already ran or was cancelled.
    ///
    /// Cancelling an interval from inside its own callback stops further firings.
    pub fn cancel(&self, id: TaskId) -> bool {
        // Drop the callback after releasing the borrow: it may own handles that cancel
        // other tasks when dropped.
        let removed = self.inner.borrow_mut().tasks.remove(id);
        removed.is_some()
    }

    /// Advance the clock to `now_ms`, fire due timers, then run one frame pass.
    ///
    /// A clock that moves backwards is held at its previous value.
    pub fn tick(&self, now_ms: f64) {
        let target = now_ms.max(self.now_ms());
        self.fire_timers(target);
        self.run_frame(target);
    }

    /// Tick at fixed `frame_ms` steps until the clock reaches `end_ms`.
    pub fn run_until(&self, end_ms: f64, frame_ms: f64) {
        let step = frame_ms.max(MIN_INTERVAL_MS);
        let mut t = self.now_ms();
        while t < end_ms {
            t = (t + step).min(end_ms);
            self.tick(t);
        }
    }

    fn fire_timers(&self, until_ms: f64) {
        loop {
            let next = self.inner.borrow().next_due_timer(until_ms);
            let Some((id, due_ms)) = next else {
                break;
            };
            self.fire_timer(id, due_ms);
        }
    }

    fn fire_timer(&self, id: TaskId, due_ms: f64) {
        enum Fired {
            Once(TimeoutCallback),
            Repeat(IntervalCallback),
        }

        let fired = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = inner.now_ms.max(due_ms);
            let is_timeout = matches!(
                inner.tasks.get(id).map(|t| &t.kind),
                Some(TaskKind::Timeout { .. })
            );
            if is_timeout {
                match inner.tasks.remove(id).map(|t| t.kind) {
                    Some(TaskKind::Timeout {
                        callback: Some(cb), ..
                    }) => Some(Fired::Once(cb)),
                    _ => None,
                }
            } else {
                match inner.tasks.get_mut(id).map(|t| &mut t.kind) {
                    Some(TaskKind::Interval { callback, .. }) => callback.take().map(Fired::Repeat),
                    _ => None,
                }
            }
        };

        match fired {
            Some(Fired::Once(cb)) => cb(),
            Some(Fired::Repeat(mut cb)) => {
                cb();
                let mut inner = self.inner.borrow_mut();
                if let Some(TaskKind::Interval {
                    due_ms,
                    period_ms,
                    callback,
                }) = inner.tasks.get_mut(id).map(|t| &mut t.kind)
                {
                    *due_ms += *period_ms;
                    *callback = Some(cb);
                }
            }
            None => {}
        }
    }

    fn run_frame(&self, now_ms: f64) {
        let ids: Vec<TaskId> = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms = now_ms;
            inner.frames_run += 1;
            let mut ids: Vec<(u64, TaskId)> = inner
                .tasks
                .iter()
                .filter(|(_, t)| matches!(t.kind, TaskKind::Frame(_)))
                .map(|(id, t)| (t.seq, id))
                .collect();
            ids.sort_unstable_by_key(|(seq, _)| *seq);
            ids.into_iter().map(|(_, id)| id).collect()
        };

        // Callbacks registered during this pass wait for the next one; callbacks cancelled by
        // an earlier callback in this pass are skipped.
        for id in ids {
            let callback = match self.inner.borrow_mut().tasks.remove(id).map(|t| t.kind) {
                Some(TaskKind::Frame(cb)) => cb,
                _ => None,
            };
            if let Some(cb) = callback {
                cb(now_ms);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/scheduler.rs"]
mod tests;
