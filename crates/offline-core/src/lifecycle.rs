//! Worker lifecycle tracking.

use std::fmt;

/// Lifecycle states of one worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Precaching the shell assets.
    #[default]
    Installing,
    /// Installed, waiting for the previous version to release its pages.
    Installed,
    /// Removing stale partitions.
    Activating,
    /// Controlling pages and intercepting requests.
    Activated,
    /// Replaced by a newer version, or failed to install.
    Redundant,
}

impl WorkerState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Installing, Installed)
                | (Installed, Activating)
                | (Activating, Activated)
                | (Installing | Installed | Activating | Activated, Redundant)
        )
    }

    /// Whether fetch events are handled in this state.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Activated)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer trait for lifecycle transitions.
pub trait LifecycleObserver: Send + Sync {
    /// Called after the worker moved from `from` to `to`.
    fn on_transition(&self, from: WorkerState, to: WorkerState);
}
