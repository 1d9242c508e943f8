//! Pause / continue / abort signalling between a move handle and its copy engine.
//!
//! The state lives in a `tokio::sync::watch` channel so commands issued before
//! the engine exists are not lost: the engine reads the latest value when it
//! starts and reacts to every later change.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Running,
    Paused,
    /// Terminal; later pause/resume requests are ignored.
    Aborted,
}

/// Sending side, shared by the handle, the orchestrator and the engine.
#[derive(Debug, Clone)]
pub struct CopyControl {
    tx: Arc<watch::Sender<ControlState>>,
}

impl Default for CopyControl {
    fn default() -> Self {
        Self::new()
    }
}

impl CopyControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ControlState::Running);
        Self { tx: Arc::new(tx) }
    }

    /// Running -> Paused. Returns true if the state changed.
    pub fn pause(&self) -> bool {
        self.transition(ControlState::Running, ControlState::Paused)
    }

    /// Paused -> Running. Returns true if the state changed.
    pub fn resume(&self) -> bool {
        self.transition(ControlState::Paused, ControlState::Running)
    }

    /// Any state -> Aborted. Returns true the first time only.
    pub fn abort(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if *state == ControlState::Aborted {
                return false;
            }
            *state = ControlState::Aborted;
            true
        })
    }

    pub fn state(&self) -> ControlState {
        *self.tx.borrow()
    }

    pub fn is_aborted(&self) -> bool {
        self.state() == ControlState::Aborted
    }

    pub fn watcher(&self) -> ControlWatcher {
        ControlWatcher {
            rx: self.tx.subscribe(),
        }
    }

    fn transition(&self, from: ControlState, to: ControlState) -> bool {
        self.tx.send_if_modified(|state| {
            if *state != from {
                return false;
            }
            *state = to;
            true
        })
    }
}

/// Outcome of waiting at a cooperative checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    /// Never paused; carry on.
    Proceed,
    /// Was paused and has been resumed.
    Resumed,
    Aborted,
}

/// Receiving side used by copy engines between entries.
#[derive(Debug, Clone)]
pub struct ControlWatcher {
    rx: watch::Receiver<ControlState>,
}

impl ControlWatcher {
    /// Wait while paused. Returns immediately when running or aborted.
    pub async fn checkpoint(&mut self) -> Checkpoint {
        let mut waited = false;
        loop {
            let state = *self.rx.borrow_and_update();
            match state {
                ControlState::Running if waited => return Checkpoint::Resumed,
                ControlState::Running => return Checkpoint::Proceed,
                ControlState::Aborted => return Checkpoint::Aborted,
                ControlState::Paused => {
                    waited = true;
                    // All senders gone: nobody can resume us.
                    if self.rx.changed().await.is_err() {
                        return Checkpoint::Aborted;
                    }
                }
            }
        }
    }

    pub fn state(&self) -> ControlState {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn transitions_follow_state() {
        let c = CopyControl::new();
        assert!(!c.resume(), "resume while running is a no-op");
        assert!(c.pause());
        assert!(!c.pause());
        assert!(c.resume());
        assert!(c.abort());
        assert!(!c.abort());
        assert!(!c.pause(), "abort is terminal");
        assert_eq!(c.state(), ControlState::Aborted);
    }

    #[tokio::test]
    async fn checkpoint_waits_for_resume() {
        let c = CopyControl::new();
        let mut w = c.watcher();
        assert_eq!(w.checkpoint().await, Checkpoint::Proceed);

        c.pause();
        let resumer = c.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            resumer.resume();
        });
        assert_eq!(w.checkpoint().await, Checkpoint::Resumed);
    }

    #[tokio::test]
    async fn checkpoint_sees_abort_while_paused() {
        let c = CopyControl::new();
        let mut w = c.watcher();
        c.pause();
        let aborter = c.clone();
        tokio::spawn(async move {
            aborter.abort();
        });
        assert_eq!(w.checkpoint().await, Checkpoint::Aborted);
    }

    #[tokio::test]
    async fn commands_before_watcher_are_kept() {
        let c = CopyControl::new();
        c.abort();
        let mut w = c.watcher();
        assert_eq!(w.checkpoint().await, Checkpoint::Aborted);
    }
}
