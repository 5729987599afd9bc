//! Chess: the sequential template. Strict turn alternation, perfect
//! information, legality delegated to the oracle.

use crate::domain::chess_oracle;
use crate::domain::state::{ChessRole, ChessState, SessionState};
use crate::domain::template::{Template, TurnStyle};
use crate::errors::{DomainError, InfraErrorKind};

pub const TEMPLATE_ID: &str = "chess.v1";

const ROLES: [&str; 2] = ["white", "black"];

#[derive(Debug)]
pub struct Chess;

impl Template for Chess {
    fn template_id(&self) -> &'static str {
        TEMPLATE_ID
    }

    fn turn_style(&self) -> TurnStyle {
        TurnStyle::Sequential
    }

    fn roles(&self) -> &'static [&'static str] {
        &ROLES
    }

    fn initial_state(&self) -> SessionState {
        SessionState::Chess(ChessState {
            fen: chess_oracle::INITIAL_FEN.to_string(),
            turn: ChessRole::White,
            moves: Vec::new(),
            outcome: None,
        })
    }

    fn legal_actions(&self, state: &SessionState, role: &str) -> Vec<String> {
        let SessionState::Chess(state) = state else {
            return Vec::new();
        };
        if state.outcome.is_some() || role != state.turn.as_str() {
            return Vec::new();
        }
        chess_oracle::legal_moves(&state.fen).unwrap_or_default()
    }

    fn apply_action(
        &self,
        state: &SessionState,
        role: &str,
        action: &str,
    ) -> Result<SessionState, DomainError> {
        let SessionState::Chess(current) = state else {
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("state does not belong to {TEMPLATE_ID}"),
            ));
        };

        if current.outcome.is_some() {
            return Err(DomainError::invalid_action("game is already over"));
        }
        if role != current.turn.as_str() {
            return Err(DomainError::invalid_action("not your turn"));
        }

        let moved = chess_oracle::apply_move(&current.fen, action)?;

        let mut next = current.clone();
        next.fen = moved.fen;
        next.turn = current.turn.opponent();
        next.moves.push(action.to_string());
        next.outcome = moved.outcome;
        Ok(SessionState::Chess(next))
    }

    fn is_terminal(&self, state: &SessionState) -> bool {
        match state {
            SessionState::Chess(s) => s.outcome.is_some(),
            _ => false,
        }
    }

    fn view_state(&self, state: &SessionState, _role: &str) -> SessionState {
        // Perfect information: every role sees the authoritative state.
        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::ChessOutcome;

    fn chess(state: &SessionState) -> &ChessState {
        match state {
            SessionState::Chess(s) => s,
            _ => panic!("expected chess state"),
        }
    }

    fn play(t: &Chess, mut state: SessionState, moves: &[(&str, &str)]) -> SessionState {
        for (role, mv) in moves {
            state = t.apply_action(&state, role, mv).unwrap();
        }
        state
    }

    #[test]
    fn white_moves_first_and_black_waits() {
        let t = Chess;
        let state = t.initial_state();
        assert_eq!(t.legal_actions(&state, "white").len(), 20);
        assert!(t.legal_actions(&state, "black").is_empty());
    }

    #[test]
    fn turn_alternates_after_each_move() {
        let t = Chess;
        let state = t.apply_action(&t.initial_state(), "white", "e2e4").unwrap();
        assert_eq!(chess(&state).turn, ChessRole::Black);
        assert_eq!(chess(&state).moves, ["e2e4"]);
        assert!(t.legal_actions(&state, "white").is_empty());
        assert!(!t.legal_actions(&state, "black").is_empty());
    }

    #[test]
    fn out_of_turn_moves_are_rejected() {
        let t = Chess;
        let err = t
            .apply_action(&t.initial_state(), "black", "e7e5")
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_, _)));
    }

    #[test]
    fn fools_mate_ends_the_game() {
        let t = Chess;
        let state = play(
            &t,
            t.initial_state(),
            &[
                ("white", "f2f3"),
                ("black", "e7e5"),
                ("white", "g2g4"),
                ("black", "d8h4"),
            ],
        );

        let s = chess(&state);
        assert_eq!(s.outcome, Some(ChessOutcome::BlackWins));
        assert!(t.is_terminal(&state));
        assert!(t.legal_actions(&state, "white").is_empty());
        assert!(t.legal_actions(&state, "black").is_empty());

        let err = t.apply_action(&state, "white", "e2e4").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_, _)));
    }

    #[test]
    fn views_are_the_identity() {
        let t = Chess;
        let state = t.apply_action(&t.initial_state(), "white", "e2e4").unwrap();
        for role in ["white", "black"] {
            assert_eq!(t.view_state(&state, role), state);
        }
    }
}
