//! Control actions and the queue that carries them to the UI thread.
//!
//! Hotkey listeners run on their own thread and never touch engine state
//! directly; they push a [`ControlAction`] and wake the UI, which drains the
//! queue before its next tick.

use std::fmt;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    PauseResume,
    Reset,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlAction::PauseResume => write!(f, "start/stop"),
            ControlAction::Reset => write!(f, "restart"),
        }
    }
}

type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct ControlSender {
    tx: Sender<ControlAction>,
    waker: Option<Waker>,
}

impl ControlSender {
    /// Call `waker` after every send so a sleeping event loop picks the action
    /// up without waiting for its next scheduled repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Returns `false` once the receiving side is gone.
    pub fn send(&self, action: ControlAction) -> bool {
        if self.tx.send(action).is_err() {
            tracing::debug!(%action, "control queue closed");
            return false;
        }
        if let Some(wake) = &self.waker {
            wake();
        }
        true
    }
}

pub fn control_channel() -> (ControlSender, Receiver<ControlAction>) {
    let (tx, rx) = channel();
    (ControlSender { tx, waker: None }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn send_wakes_receiver() {
        let woken = Arc::new(AtomicUsize::new(0));
        let counter = woken.clone();
        let (tx, rx) = control_channel();
        let tx = tx.with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(tx.send(ControlAction::Reset));
        assert_eq!(rx.try_recv().ok(), Some(ControlAction::Reset));
        assert_eq!(woken.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn send_reports_closed_queue() {
        let (tx, rx) = control_channel();
        drop(rx);
        assert!(!tx.send(ControlAction::PauseResume));
    }
}
