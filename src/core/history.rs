//! Transition history of a machine.
//!
//! Every committed transition is recorded, whether its dedicated hook ran,
//! the default handler ran in its place, or the hook failed.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which hook carried out a dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchKind {
    /// The registered hook ran to completion.
    Dedicated,
    /// No hook was registered; the default handler ran.
    Default,
    /// The registered hook failed; the default handler ran instead.
    Recovered,
    /// The registered hook failed and was reported to the caller.
    Faulted,
}

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use aid_fsm::core::{DispatchKind, State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Some(Door::Open),
///     to: Door::Closed,
///     timestamp: Utc::now(),
///     kind: DispatchKind::Dedicated,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being left, `None` for the very first transition of an unstarted machine
    pub from: Option<S>,
    /// The state being entered
    pub to: S,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
    /// Which hook carried the transition out
    pub kind: DispatchKind,
}

/// Ordered history of state transitions.
///
/// `record` is pure and returns a new history. A history may be bounded
/// with [`StateHistory::bounded`]; once full, the oldest transition is
/// evicted for each new one.
///
/// # Example
///
/// ```rust
/// use aid_fsm::core::{DispatchKind, State, StateHistory, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase { One, Two, Three }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::One => "One",
///             Self::Two => "Two",
///             Self::Three => "Three",
///         }
///     }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: Some(Phase::One),
///         to: Phase::Two,
///         timestamp: Utc::now(),
///         kind: DispatchKind::Dedicated,
///     })
///     .record(StateTransition {
///         from: Some(Phase::Two),
///         to: Phase::Three,
///         timestamp: Utc::now(),
///         kind: DispatchKind::Default,
///     });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            limit: None,
        }
    }

    /// Create a new empty history keeping at most `limit` transitions.
    ///
    /// A limit of zero records nothing.
    pub fn bounded(limit: usize) -> Self {
        Self {
            transitions: Vec::with_capacity(limit.min(64)),
            limit: Some(limit),
        }
    }

    /// Maximum number of transitions kept, `None` if unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Change the limit, evicting the oldest transitions that no longer fit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.evict();
    }

    /// Record a transition, returning a new history.
    ///
    /// The existing history is left untouched.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Append a transition in place.
    pub(crate) fn push(&mut self, transition: StateTransition<S>) {
        if self.limit == Some(0) {
            return;
        }
        self.transitions.push(transition);
        self.evict();
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            let excess = self.transitions.len().saturating_sub(limit);
            if excess > 0 {
                self.transitions.drain(..excess);
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Starts with the `from` state of the first kept transition when there
    /// is one, followed by the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(from) = self.transitions.first().and_then(|t| t.from.as_ref()) {
            path.push(from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    ///
    /// `None` for an empty history.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of transitions whose dedicated hook did not run to completion.
    pub fn fallback_count(&self) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.kind != DispatchKind::Dedicated)
            .count()
    }

    /// Get all transitions in order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// The most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
