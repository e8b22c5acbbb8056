//! Editing-time preview: one session per element, restart on re-trigger, revert after a grace
//! delay.

use crate::animation::playback::Target;
use crate::animation::tween::CancelHandle;
use crate::deck::ElementData;
use crate::foundation::error::MotionResult;
use crate::scheduler::{Scheduler, TaskId};
use crate::sequence::{PlaybackCtx, log_declined, stage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Handles owned by one element's preview.
#[derive(Debug, Default)]
pub struct PlaybackSession {
    tween: Option<CancelHandle>,
    reset_timer: Option<TaskId>,
    target: Option<Target>,
}

impl PlaybackSession {
    pub fn is_playing(&self) -> bool {
        self.tween.as_ref().is_some_and(CancelHandle::is_running)
    }

    pub fn reset_pending(&self, scheduler: &Scheduler) -> bool {
        self.reset_timer.is_some_and(|id| scheduler.is_pending(id))
    }

    /// Cancel the tween and any pending reset. The node is left as is.
    fn clear(&mut self, scheduler: &Scheduler) {
        if let Some(tween) = self.tween.take() {
            tween.cancel();
        }
        if let Some(timer) = self.reset_timer.take() {
            scheduler.cancel(timer);
        }
    }
}

/// Preview sessions for the elements of one editor instance.
#[derive(Debug, Default)]
pub struct Previewer {
    sessions: HashMap<String, Rc<RefCell<PlaybackSession>>>,
}

impl Previewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play `preset_id` on `element`, replacing any preview already running on it.
    ///
    /// Nothing is cancelled or mutated unless the preset, its applicability and the node all
    /// check out. After completion the node is restored once `preview_reset_delay_ms` elapses.
    #[tracing::instrument(skip(self, ctx, element), fields(element = %element.id))]
    pub fn preview(
        &mut self,
        ctx: &PlaybackCtx<'_>,
        element: &ElementData,
        preset_id: &str,
    ) -> MotionResult<CancelHandle> {
        let staged = stage(ctx, element, preset_id).inspect_err(|err| {
            log_declined(&element.id, err);
        })?;

        let session = self.sessions.entry(element.id.clone()).or_default().clone();
        session.borrow_mut().clear(ctx.scheduler);

        staged.reset_and_setup();

        let on_complete = {
            let scheduler = ctx.scheduler.clone();
            let target = staged.target.clone();
            let session = Rc::downgrade(&session);
            let delay_ms = ctx.opts.preview_reset_delay_ms;
            move || {
                let timer_session: Weak<RefCell<PlaybackSession>> = session.clone();
                let timer = scheduler.set_timeout(delay_ms, move || {
                    target.restore();
                    if let Some(session) = timer_session.upgrade() {
                        session.borrow_mut().reset_timer = None;
                    }
                    tracing::debug!("preview reverted");
                });
                if let Some(session) = session.upgrade() {
                    session.borrow_mut().reset_timer = Some(timer);
                }
            }
        };

        let handle = staged.play(ctx.scheduler, on_complete);
        let mut session = session.borrow_mut();
        session.tween = Some(handle.clone());
        session.target = Some(staged.target);
        Ok(handle)
    }

    /// Stop the element's preview without reverting it.
    pub fn cancel(&mut self, element_id: &str, scheduler: &Scheduler) {
        if let Some(session) = self.sessions.remove(element_id) {
            session.borrow_mut().clear(scheduler);
        }
    }

    /// Stop every preview; used when the editor tears down.
    pub fn cancel_all(&mut self, scheduler: &Scheduler) {
        for (_, session) in self.sessions.drain() {
            session.borrow_mut().clear(scheduler);
        }
    }

    /// Stop every preview and put its node back to the persisted state at once.
    pub fn revert_all(&mut self, scheduler: &Scheduler) {
        for (_, session) in self.sessions.drain() {
            let mut session = session.borrow_mut();
            session.clear(scheduler);
            if let Some(target) = session.target.take() {
                target.restore();
            }
        }
    }

    pub fn is_playing(&self, element_id: &str) -> bool {
        self.sessions
            .get(element_id)
            .is_some_and(|s| s.borrow().is_playing())
    }

    pub fn reset_pending(&self, element_id: &str, scheduler: &Scheduler) -> bool {
        self.sessions
            .get(element_id)
            .is_some_and(|s| s.borrow().reset_pending(scheduler))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/preview.rs"]
mod tests;
