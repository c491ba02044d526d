//! State machine trait for status enums.

use super::ValidationError;

/// Trait for status enums whose values form a transition graph.
///
/// Implementors list the edges; validated transitions and the terminal
/// check come for free.
///
/// ```ignore
/// let next = InvitationStatus::Pending.transition_to(InvitationStatus::Expired)?;
/// assert!(next.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if an edge leads from self to target.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all states reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
