use std::fmt;

/// Lifecycle of the single session owned by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stopped,
    Errored,
    Done,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Errored => "errored",
            Self::Done => "done",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// States from which `continue` may resume, given a non-empty transcript.
    ///
    /// `Done` is included: the service may be asked for more turns after it
    /// declared the debate finished.
    pub fn allows_continue(&self) -> bool {
        matches!(self, Self::Stopped | Self::Errored | Self::Done)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which user actions are currently available. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
    pub continue_enabled: bool,
}

impl Controls {
    #[must_use]
    pub fn project(state: SessionState, transcript_len: usize) -> Self {
        let running = state.is_running();
        Self {
            start_enabled: !running,
            stop_enabled: running,
            continue_enabled: state.allows_continue() && transcript_len > 0,
        }
    }
}
