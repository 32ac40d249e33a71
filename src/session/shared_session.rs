//! Shared single-threaded handle to a session.
//!
//! Hosts that let subscriber callbacks reach the session hold it through
//! this handle. A call made while another call on the same session is still
//! running (typically from inside a subscriber) fails with `ReentrantCall`
//! instead of interleaving with the outer mutation.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::engine_errors::{EngineError, EngineResult};
use crate::session::session_controller::{SessionController, SessionSnapshot, SubscriptionToken};

#[derive(Debug, Clone)]
pub struct SharedSession(Rc<RefCell<SessionController>>);

/// Non-owning handle, for use inside subscriber callbacks.
#[derive(Debug, Clone)]
pub struct WeakSession(Weak<RefCell<SessionController>>);

impl SharedSession {
    pub fn new(controller: SessionController) -> Self {
        Self(Rc::new(RefCell::new(controller)))
    }

    pub fn downgrade(&self) -> WeakSession {
        WeakSession(Rc::downgrade(&self.0))
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<T>(
        &self,
        f: impl FnOnce(&mut SessionController) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut controller = self
            .0
            .try_borrow_mut()
            .map_err(|_| EngineError::ReentrantCall)?;
        f(&mut controller)
    }

    pub fn perform_action(&self, notation: &str) -> EngineResult<()> {
        self.with(|session| session.perform_action(notation))
    }

    pub fn undo(&self) -> EngineResult<()> {
        self.with(|session| session.undo())
    }

    pub fn navigate_to(&self, ply_index: isize) -> EngineResult<()> {
        self.with(|session| session.navigate_to(ply_index))
    }

    pub fn snapshot(&self) -> EngineResult<SessionSnapshot> {
        self.0
            .try_borrow()
            .map(|controller| controller.snapshot())
            .map_err(|_| EngineError::ReentrantCall)
    }

    pub fn subscribe<F>(&self, callback: F) -> EngineResult<SubscriptionToken>
    where
        F: FnMut(&SessionSnapshot) + 'static,
    {
        self.with(|session| Ok(session.subscribe(callback)))
    }
}

impl WeakSession {
    /// `None` once the session has been dropped.
    pub fn upgrade(&self) -> Option<SharedSession> {
        self.0.upgrade().map(SharedSession)
    }
}

#[cfg(test)]
mod tests {
    use super::SharedSession;
    use crate::clock::elapsed_source::ManualClock;
    use crate::engine_errors::{EngineError, EngineResult};
    use crate::session::session_config::SessionConfig;
    use crate::session::session_controller::SessionController;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn shared() -> SharedSession {
        let mut controller = SessionController::with_elapsed_source(Box::new(ManualClock::new()));
        controller
            .initialize(SessionConfig::default())
            .expect("init");
        SharedSession::new(controller)
    }

    #[test]
    fn subscribers_cannot_reenter_the_session() {
        let session = shared();
        let weak = session.downgrade();
        let attempts: Rc<RefCell<Vec<EngineResult<()>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&attempts);

        session
            .subscribe(move |_| {
                if let Some(session) = weak.upgrade() {
                    sink.borrow_mut().push(session.perform_action("m:d2d4"));
                    sink.borrow_mut().push(session.snapshot().map(|_| ()));
                }
            })
            .expect("subscribe");

        session.perform_action("b:e2e4").expect("outer call");

        assert_eq!(
            *attempts.borrow(),
            vec![Err(EngineError::ReentrantCall), Err(EngineError::ReentrantCall)]
        );
        let snapshot = session.snapshot().expect("not borrowed");
        assert_eq!(snapshot.history_len, 1);
    }

    #[test]
    fn sequential_calls_go_through() {
        let session = shared();
        session.perform_action("b:e2e4").expect("ban");
        session.perform_action("m:d2d4").expect("move");
        session.navigate_to(0).expect("navigate");
        assert_eq!(session.snapshot().expect("snapshot").cursor, Some(0));
        session.navigate_to(1).expect("back to live");
        session.undo().expect("undo");
        assert_eq!(session.snapshot().expect("snapshot").history_len, 1);
    }

    #[test]
    fn weak_handles_do_not_keep_the_session_alive() {
        let session = shared();
        let weak = session.downgrade();
        assert!(weak.upgrade().is_some());
        drop(session);
        assert!(weak.upgrade().is_none());
    }
}
