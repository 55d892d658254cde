//! Hook signatures, hook errors and dispatch outcomes.

use crate::core::{DispatchKind, State};
use crate::machine::StateMachine;
use thiserror::Error;

/// Result returned by every action and transition hook.
pub type HookResult = Result<(), HookError>;

/// Action or transition registered for a state or a state pair.
pub type Hook<S, C> = Box<dyn Fn(&mut StateMachine<S, C>) -> HookResult + Send + Sync>;

/// Handler run when no dedicated hook applies. Default handlers cannot fail.
pub type DefaultHook<S, C> = Box<dyn Fn(&mut StateMachine<S, C>) + Send + Sync>;

/// Error reported by a hook that could not do its job.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Source(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HookError {
    /// Shorthand for [`HookError::Failed`].
    pub fn msg(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }
}

/// What an instruction set does after a registered hook returned an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Log the error and run the default handler in place of the hook.
    #[default]
    Fallback,

    /// Skip the default handler and hand the error back in the [`Dispatch`].
    Surface,
}

/// Outcome of a single `act` or `transit` call.
///
/// Dispatching never fails outright; a failed hook is reported here so the
/// caller can tell a fallback apart from the dedicated path.
#[derive(Debug)]
#[must_use = "a failed hook is only reported through the returned `Dispatch`"]
pub enum Dispatch {
    /// The registered hook ran to completion.
    Dedicated,

    /// Nothing was registered; the default handler ran.
    Default,

    /// The registered hook failed and the default handler ran instead.
    Recovered(HookError),

    /// The registered hook failed and the default handler was skipped.
    Faulted(HookError),
}

impl Dispatch {
    pub fn is_dedicated(&self) -> bool {
        matches!(self, Dispatch::Dedicated)
    }

    /// True when the default handler ran, whether or not a hook failed first.
    pub fn is_default(&self) -> bool {
        matches!(self, Dispatch::Default | Dispatch::Recovered(_))
    }

    /// The error of a failed hook, if one failed.
    pub fn error(&self) -> Option<&HookError> {
        match self {
            Dispatch::Recovered(error) | Dispatch::Faulted(error) => Some(error),
            Dispatch::Dedicated | Dispatch::Default => None,
        }
    }

    pub fn kind(&self) -> DispatchKind {
        match self {
            Dispatch::Dedicated => DispatchKind::Dedicated,
            Dispatch::Default => DispatchKind::Default,
            Dispatch::Recovered(_) => DispatchKind::Recovered,
            Dispatch::Faulted(_) => DispatchKind::Faulted,
        }
    }
}

pub(crate) fn state_label<S: State>(state: Option<&S>) -> &str {
    state.map_or("<unset>", |s| s.name())
}
