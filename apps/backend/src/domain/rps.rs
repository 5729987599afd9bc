//! Rock-paper-scissors: the simultaneous template.
//!
//! Both roles commit a hidden choice; once both are in, the phase flips to
//! reveal and the result is computed. A draw is terminal like any other
//! result — there is no replay round at the template level.

use crate::domain::state::{RpsChoice, RpsChoices, RpsPhase, RpsResult, RpsState, SessionState};
use crate::domain::template::{Template, TurnStyle};
use crate::errors::{DomainError, InfraErrorKind};

pub const TEMPLATE_ID: &str = "rps.v1";

const ROLES: [&str; 2] = ["player_1", "player_2"];
const CHOICES: [RpsChoice; 3] = [RpsChoice::Rock, RpsChoice::Paper, RpsChoice::Scissors];

fn beats(a: RpsChoice, b: RpsChoice) -> bool {
    matches!(
        (a, b),
        (RpsChoice::Rock, RpsChoice::Scissors)
            | (RpsChoice::Paper, RpsChoice::Rock)
            | (RpsChoice::Scissors, RpsChoice::Paper)
    )
}

fn resolve(p1: RpsChoice, p2: RpsChoice) -> RpsResult {
    if p1 == p2 {
        RpsResult::Draw
    } else if beats(p1, p2) {
        RpsResult::Player1Wins
    } else {
        RpsResult::Player2Wins
    }
}

#[derive(Debug)]
pub struct RockPaperScissors;

impl Template for RockPaperScissors {
    fn template_id(&self) -> &'static str {
        TEMPLATE_ID
    }

    fn turn_style(&self) -> TurnStyle {
        TurnStyle::Simultaneous
    }

    fn roles(&self) -> &'static [&'static str] {
        &ROLES
    }

    fn initial_state(&self) -> SessionState {
        SessionState::Rps(RpsState {
            phase: RpsPhase::Commit,
            choices: RpsChoices::default(),
            result: None,
        })
    }

    fn legal_actions(&self, state: &SessionState, role: &str) -> Vec<String> {
        let SessionState::Rps(state) = state else {
            return Vec::new();
        };
        if state.result.is_some() {
            return Vec::new();
        }
        match state.choices.slot(role) {
            // Unknown role, or already committed this phase
            None | Some(Some(_)) => Vec::new(),
            Some(None) => CHOICES.iter().map(|c| c.as_str().to_string()).collect(),
        }
    }

    fn apply_action(
        &self,
        state: &SessionState,
        role: &str,
        action: &str,
    ) -> Result<SessionState, DomainError> {
        let SessionState::Rps(current) = state else {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("state does not belong to {TEMPLATE_ID}"),
            ));
        };

        if current.result.is_some() {
            return Err(DomainError::invalid_action("game is already over"));
        }

        let committed = current
            .choices
            .slot(role)
            .ok_or_else(|| DomainError::invalid_action(format!("unknown role: {role}")))?;
        if committed.is_some() {
            return Err(DomainError::already_acted(
                "already submitted a choice this phase",
            ));
        }

        let choice = RpsChoice::parse(action)
            .ok_or_else(|| DomainError::invalid_action(format!("invalid choice: {action}")))?;

        let mut next = current.clone();
        next.choices.set(role, choice);

        if let (Some(p1), Some(p2)) = (next.choices.player_1, next.choices.player_2) {
            next.phase = RpsPhase::Reveal;
            next.result = Some(resolve(p1, p2));
        }

        Ok(SessionState::Rps(next))
    }

    fn is_terminal(&self, state: &SessionState) -> bool {
        match state {
            SessionState::Rps(s) => s.result.is_some(),
            _ => false,
        }
    }

    fn view_state(&self, state: &SessionState, role: &str) -> SessionState {
        let SessionState::Rps(current) = state else {
            return state.clone();
        };

        let mut view = current.clone();
        if view.phase == RpsPhase::Commit {
            // Opponent commitments are masked until reveal; own choice stays
            // visible. Masking a mask is a no-op, keeping views idempotent.
            if role != "player_1" && view.choices.player_1.is_some() {
                view.choices.player_1 = Some(RpsChoice::Hidden);
            }
            if role != "player_2" && view.choices.player_2.is_some() {
                view.choices.player_2 = Some(RpsChoice::Hidden);
            }
        }
        SessionState::Rps(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rps(state: &SessionState) -> &RpsState {
        match state {
            SessionState::Rps(s) => s,
            _ => panic!("expected rps state"),
        }
    }

    #[test]
    fn initial_state_offers_all_choices_to_both_roles() {
        let t = RockPaperScissors;
        let state = t.initial_state();
        for role in ["player_1", "player_2"] {
            assert_eq!(t.legal_actions(&state, role), ["rock", "paper", "scissors"]);
        }
        assert!(t.legal_actions(&state, "spectator").is_empty());
        assert!(!t.is_terminal(&state));
    }

    #[test]
    fn committed_role_has_no_legal_actions() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();
        assert!(t.legal_actions(&state, "player_1").is_empty());
        assert_eq!(
            t.legal_actions(&state, "player_2"),
            ["rock", "paper", "scissors"]
        );
        assert_eq!(rps(&state).phase, RpsPhase::Commit);
    }

    #[test]
    fn second_commit_reveals_and_resolves() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();
        let state = t.apply_action(&state, "player_2", "scissors").unwrap();

        let s = rps(&state);
        assert_eq!(s.phase, RpsPhase::Reveal);
        assert_eq!(s.result, Some(RpsResult::Player1Wins));
        assert!(t.is_terminal(&state));
        assert!(t.legal_actions(&state, "player_1").is_empty());
        assert!(t.legal_actions(&state, "player_2").is_empty());
    }

    #[test]
    fn draw_is_terminal() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "paper").unwrap();
        let state = t.apply_action(&state, "player_2", "paper").unwrap();

        assert_eq!(rps(&state).result, Some(RpsResult::Draw));
        assert!(t.is_terminal(&state));
        let err = t.apply_action(&state, "player_1", "rock").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_, _)));
    }

    #[test]
    fn double_commit_is_already_acted() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();
        let err = t.apply_action(&state, "player_1", "paper").unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(crate::errors::ValidationKind::AlreadyActed, _)
        ));
    }

    #[test]
    fn commit_phase_masks_only_the_opponent() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();

        let own = t.view_state(&state, "player_1");
        assert_eq!(rps(&own).choices.player_1, Some(RpsChoice::Rock));

        let opponent = t.view_state(&state, "player_2");
        assert_eq!(rps(&opponent).choices.player_1, Some(RpsChoice::Hidden));
        assert_eq!(rps(&opponent).choices.player_2, None);
    }

    #[test]
    fn reveal_phase_hides_nothing() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();
        let state = t.apply_action(&state, "player_2", "paper").unwrap();

        let view = t.view_state(&state, "player_1");
        assert_eq!(view, state);
    }

    #[test]
    fn views_are_idempotent() {
        let t = RockPaperScissors;
        let state = t.apply_action(&t.initial_state(), "player_1", "rock").unwrap();
        for role in ["player_1", "player_2"] {
            let once = t.view_state(&state, role);
            let twice = t.view_state(&once, role);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn hidden_is_not_a_playable_action() {
        let t = RockPaperScissors;
        let err = t
            .apply_action(&t.initial_state(), "player_1", "hidden")
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_, _)));
    }
}
