/// Tracks the shutdown handshake with the Tauri run loop: the first exit
/// request is deferred while the child process is stopped, then a stored
/// allowance lets the follow-up exit request pass through.
#[derive(Debug, Default)]
pub(crate) struct ExitStateMachine {
    quitting: bool,
    cleanup_started: bool,
    exit_request_allowed: bool,
}

impl ExitStateMachine {
    pub(crate) fn mark_quitting(&mut self) {
        self.quitting = true;
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Admits exactly one cleanup pass.
    pub(crate) fn try_begin_cleanup(&mut self) -> bool {
        if self.cleanup_started {
            return false;
        }
        self.cleanup_started = true;
        self.quitting = true;
        true
    }

    pub(crate) fn allow_next_exit_request(&mut self) {
        self.exit_request_allowed = true;
    }

    pub(crate) fn take_exit_request_allowance(&mut self) -> bool {
        let allowed = self.exit_request_allowed;
        self.exit_request_allowed = false;
        allowed
    }
}
