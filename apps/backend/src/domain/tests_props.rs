//! Property tests over the template contract.

use proptest::prelude::*;

use crate::domain::state::{RpsChoice, RpsChoices, RpsPhase, RpsResult, RpsState, SessionState};
use crate::domain::template::Template;
use crate::domain::{chess, rps};

fn arb_choice() -> impl Strategy<Value = RpsChoice> {
    prop::sample::select(vec![RpsChoice::Rock, RpsChoice::Paper, RpsChoice::Scissors])
}

fn arb_slot() -> impl Strategy<Value = Option<RpsChoice>> {
    prop::option::of(arb_choice())
}

fn arb_role() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["player_1", "player_2"])
}

/// Any commit-phase state reachable before resolution.
fn arb_commit_state() -> impl Strategy<Value = SessionState> {
    (arb_slot(), arb_slot()).prop_filter_map("both committed resolves the phase", |(p1, p2)| {
        if p1.is_some() && p2.is_some() {
            return None;
        }
        Some(SessionState::Rps(RpsState {
            phase: RpsPhase::Commit,
            choices: RpsChoices {
                player_1: p1,
                player_2: p2,
            },
            result: None,
        }))
    })
}

proptest! {
    /// Swapping the players mirrors the result.
    #[test]
    fn rps_resolution_is_antisymmetric(a in arb_choice(), b in arb_choice()) {
        let t = rps::RockPaperScissors;
        let forward = t
            .apply_action(&t.initial_state(), "player_1", a.as_str())
            .and_then(|s| t.apply_action(&s, "player_2", b.as_str()))
            .unwrap();
        let backward = t
            .apply_action(&t.initial_state(), "player_1", b.as_str())
            .and_then(|s| t.apply_action(&s, "player_2", a.as_str()))
            .unwrap();

        let result_of = |s: &SessionState| match s {
            SessionState::Rps(s) => s.result.unwrap(),
            _ => unreachable!(),
        };
        let mirrored = match result_of(&forward) {
            RpsResult::Player1Wins => RpsResult::Player2Wins,
            RpsResult::Player2Wins => RpsResult::Player1Wins,
            RpsResult::Draw => RpsResult::Draw,
        };
        prop_assert_eq!(result_of(&backward), mirrored);
    }

    /// Views never change under re-application.
    #[test]
    fn rps_views_are_idempotent(state in arb_commit_state(), role in arb_role()) {
        let t = rps::RockPaperScissors;
        let once = t.view_state(&state, role);
        let twice = t.view_state(&once, role);
        prop_assert_eq!(once, twice);
    }

    /// Every accepted action was offered as legal, and the acceptance removes
    /// the role from the acting set.
    #[test]
    fn rps_accepted_actions_were_legal(state in arb_commit_state(), role in arb_role(), choice in arb_choice()) {
        let t = rps::RockPaperScissors;
        let legal = t.legal_actions(&state, role);
        match t.apply_action(&state, role, choice.as_str()) {
            Ok(next) => {
                prop_assert!(legal.contains(&choice.as_str().to_string()));
                prop_assert!(t.legal_actions(&next, role).is_empty());
            }
            Err(_) => prop_assert!(legal.is_empty()),
        }
    }

    /// A short random walk through chess keeps legality and alternation
    /// coherent with the oracle.
    #[test]
    fn chess_random_walk_stays_coherent(picks in prop::collection::vec(0usize..64, 0..12)) {
        let t = chess::Chess;
        let mut state = t.initial_state();

        for pick in picks {
            let (turn, terminal) = match &state {
                SessionState::Chess(s) => (s.turn, s.outcome.is_some()),
                _ => unreachable!(),
            };
            if terminal {
                break;
            }
            let role = turn.as_str();
            let legal = t.legal_actions(&state, role);
            prop_assert!(!legal.is_empty());
            prop_assert!(t.legal_actions(&state, turn.opponent().as_str()).is_empty());

            let action = &legal[pick % legal.len()];
            state = t.apply_action(&state, role, action).unwrap();
        }
    }
}
