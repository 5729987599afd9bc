use crate::domain::state::SessionState;
use crate::errors::DomainError;

/// Concurrency shape of a template. The arbiter's submission precondition
/// depends on it: sequential templates demand an `expected_tick` that must
/// match the session's current tick, simultaneous templates detect duplicate
/// submissions through an empty legal-action set instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStyle {
    Sequential,
    Simultaneous,
}

/// Capability set every game template provides.
///
/// All methods are pure: same input, same output, no I/O, inputs are never
/// mutated. `apply_action` returns a fresh state document.
pub trait Template: Send + Sync + std::fmt::Debug {
    /// Stable identifier, e.g. `"chess.v1"`. Matches the registry key.
    fn template_id(&self) -> &'static str;

    fn turn_style(&self) -> TurnStyle;

    /// Ordered, fixed role set for this template version.
    fn roles(&self) -> &'static [&'static str];

    /// Deterministic starting state; validates under this template.
    fn initial_state(&self) -> SessionState;

    /// Legal action strings for `role` in `state`. Empty iff the role cannot
    /// act. Order carries no meaning but is deterministic.
    fn legal_actions(&self, state: &SessionState, role: &str) -> Vec<String>;

    /// Apply `action` for `role`, producing the successor state. Fails when
    /// the action is not in `legal_actions(state, role)`.
    fn apply_action(
        &self,
        state: &SessionState,
        role: &str,
        action: &str,
    ) -> Result<SessionState, DomainError>;

    /// True once no role has any legal action left.
    fn is_terminal(&self, state: &SessionState) -> bool;

    /// Role-filtered view of `state`. Idempotent:
    /// `view_state(view_state(s, r), r) == view_state(s, r)`.
    fn view_state(&self, state: &SessionState, role: &str) -> SessionState;
}
