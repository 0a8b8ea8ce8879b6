//! Forward-only lifecycle transitions for status enums.

use std::fmt::Debug;

/// A status enum whose legal moves are a fixed table.
///
/// ```ignore
/// let next = SessionStatus::Scheduled.transition_to(SessionStatus::InProgress)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug + 'static {
    /// States reachable in one step from `self`.
    fn successors(&self) -> &'static [Self];

    fn can_transition_to(&self, target: &Self) -> bool {
        self.successors().contains(target)
    }

    /// Returns `target` if the move is legal, otherwise the rejected pair.
    fn transition_to(&self, target: Self) -> Result<Self, IllegalTransition<Self>> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(IllegalTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// No way out.
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IllegalTransition<S> {
    pub from: S,
    pub to: S,
}
