mod common;

use backend::entities::sessions::SessionStatus;
use backend::errors::ErrorCode;
use backend::state::AppState;

async fn chess_session(state: &AppState) -> (String, String, String) {
    let (white, _) = common::claimed_agent(state).await;
    let (black, _) = common::claimed_agent(state).await;

    let session = common::create_session(
        state,
        &white,
        "chess.v1",
        &[
            ("white", Some(white.as_str())),
            ("black", Some(black.as_str())),
        ],
    )
    .await
    .unwrap();

    (session.session_id, white, black)
}

#[tokio::test]
async fn scholars_mate_completes_the_session() {
    let state = common::state().await;
    let (session_id, white, black) = chess_session(&state).await;

    let moves = [
        (&white, "e2e4"),
        (&black, "e7e5"),
        (&white, "f1c4"),
        (&black, "b8c6"),
        (&white, "d1h5"),
        (&black, "g8f6"),
        (&white, "h5f7"),
    ];

    let mut last = None;
    for (tick, (agent, mv)) in moves.iter().enumerate() {
        let outcome = common::submit(&state, agent, &session_id, mv, Some(tick as i64))
            .await
            .unwrap();
        assert_eq!(outcome.tick, tick as i64 + 1);
        last = Some(outcome);
    }

    let last = last.unwrap();
    assert_eq!(last.tick, 7);
    assert_eq!(last.status, SessionStatus::Completed);
    assert_eq!(last.state["outcome"], "white_wins");

    let log = common::read_log(&state, &session_id, &white).await.unwrap();
    assert_eq!(log.len(), 7);
    let ticks: Vec<i64> = log.iter().map(|e| e.tick).collect();
    assert_eq!(ticks, [0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(log[6].action, "h5f7");
    assert_eq!(log[6].role, "white");
}

#[tokio::test]
async fn out_of_turn_submission_is_invalid_and_leaves_state_alone() {
    let state = common::state().await;
    let (session_id, _white, black) = chess_session(&state).await;

    let err = common::submit(&state, &black, &session_id, "e7e5", Some(0))
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::InvalidAction);

    let view = common::read(&state, &session_id, &black).await.unwrap();
    assert_eq!(view.tick, 0);
    assert_eq!(view.status, SessionStatus::Active);
}

#[tokio::test]
async fn stale_tick_is_a_conflict() {
    let state = common::state().await;
    let (session_id, white, _black) = chess_session(&state).await;

    let outcome = common::submit(&state, &white, &session_id, "e2e4", Some(0))
        .await
        .unwrap();
    assert_eq!(outcome.tick, 1);

    let err = common::submit(&state, &white, &session_id, "d2d4", Some(0))
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::Conflict);
}

#[tokio::test]
async fn replaying_the_same_submission_conflicts() {
    let state = common::state().await;
    let (session_id, white, _black) = chess_session(&state).await;

    common::submit(&state, &white, &session_id, "e2e4", Some(0))
        .await
        .unwrap();
    let err = common::submit(&state, &white, &session_id, "e2e4", Some(0))
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::Conflict);
}

#[tokio::test]
async fn sequential_templates_demand_an_expected_tick() {
    let state = common::state().await;
    let (session_id, white, _black) = chess_session(&state).await;

    let err = common::submit(&state, &white, &session_id, "e2e4", None)
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn completed_sessions_reject_further_actions() {
    let state = common::state().await;
    let (session_id, white, black) = chess_session(&state).await;

    // Fool's mate: fastest possible checkmate.
    for (tick, (agent, mv)) in [
        (&white, "f2f3"),
        (&black, "e7e5"),
        (&white, "g2g4"),
        (&black, "d8h4"),
    ]
    .iter()
    .enumerate()
    {
        common::submit(&state, agent, &session_id, mv, Some(tick as i64))
            .await
            .unwrap();
    }

    let view = common::read(&state, &session_id, &white).await.unwrap();
    assert_eq!(view.status, SessionStatus::Completed);
    assert_eq!(view.state["outcome"], "black_wins");
    assert!(view.legal_actions.is_empty());

    let err = common::submit(&state, &white, &session_id, "e2e4", Some(4))
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::InvalidAction);

    // Frozen: tick no longer advances.
    let view = common::read(&state, &session_id, &white).await.unwrap();
    assert_eq!(view.tick, 4);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let state = common::state().await;
    let (agent, _) = common::claimed_agent(&state).await;

    let err = common::submit(&state, &agent, "no-such-session", "e2e4", Some(0))
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::NotFound);
}

#[tokio::test]
async fn legal_actions_follow_the_side_to_move() {
    let state = common::state().await;
    let (session_id, white, black) = chess_session(&state).await;

    let view = common::read(&state, &session_id, &black).await.unwrap();
    assert!(view.legal_actions.is_empty());

    common::submit(&state, &white, &session_id, "e2e4", Some(0))
        .await
        .unwrap();

    let view = common::read(&state, &session_id, &black).await.unwrap();
    assert!(view.legal_actions.contains(&"e7e5".to_string()));
    let view = common::read(&state, &session_id, &white).await.unwrap();
    assert!(view.legal_actions.is_empty());
}
