//! UI-thread affinity checks.
//!
//! Everything in an editor runs on the host's UI thread. `EditorSurface` is
//! `!Send`, which rules out moving it elsewhere; [`UiThread`] additionally
//! catches construction on one thread and use on another in debug builds
//! (e.g. a surface created inside a window-thread closure but touched from a
//! host callback).

use std::thread::{self, ThreadId};

/// Records the thread an editor was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiThread {
    id: ThreadId,
}

impl UiThread {
    /// Capture the calling thread as the UI thread.
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// Whether the caller is on the recorded thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Debug-build precondition: the caller must be on the UI thread.
    #[track_caller]
    pub fn assert_current(&self, operation: &'static str) {
        debug_assert!(
            self.is_current(),
            "{operation} must be called from the editor's UI thread"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_thread_is_current() {
        let ui = UiThread::current();
        assert!(ui.is_current());
        ui.assert_current("test");
    }

    #[test]
    fn other_thread_is_not_current() {
        let ui = UiThread::current();
        let on_other = std::thread::spawn(move || ui.is_current()).join().unwrap();
        assert!(!on_other);
    }
}
