mod common;

use backend::errors::ErrorCode;

#[tokio::test]
async fn log_ticks_form_a_contiguous_prefix() {
    let state = common::state().await;
    let (white, _) = common::claimed_agent(&state).await;
    let (black, _) = common::claimed_agent(&state).await;

    let session = common::create_session(
        &state,
        &white,
        "chess.v1",
        &[
            ("white", Some(white.as_str())),
            ("black", Some(black.as_str())),
        ],
    )
    .await
    .unwrap();

    for (tick, (agent, mv)) in [
        (&white, "e2e4"),
        (&black, "e7e5"),
        (&white, "g1f3"),
        (&black, "b8c6"),
    ]
    .iter()
    .enumerate()
    {
        common::submit(&state, agent, &session.session_id, mv, Some(tick as i64))
            .await
            .unwrap();
    }

    let view = common::read(&state, &session.session_id, &white).await.unwrap();
    let log = common::read_log(&state, &session.session_id, &white)
        .await
        .unwrap();

    // The log is exactly {0, 1, ..., tick - 1}.
    assert_eq!(log.len() as i64, view.tick);
    let ticks: Vec<i64> = log.iter().map(|e| e.tick).collect();
    assert_eq!(ticks, (0..view.tick).collect::<Vec<i64>>());
}

#[tokio::test]
async fn log_entries_never_change_once_written() {
    let state = common::state().await;
    let (p1, _) = common::claimed_agent(&state).await;
    let (p2, _) = common::claimed_agent(&state).await;

    let session = common::create_session(
        &state,
        &p1,
        "rps.v1",
        &[("player_1", Some(p1.as_str())), ("player_2", Some(p2.as_str()))],
    )
    .await
    .unwrap();

    common::submit(&state, &p1, &session.session_id, "rock", None)
        .await
        .unwrap();
    let before = common::read_log(&state, &session.session_id, &p1)
        .await
        .unwrap();

    common::submit(&state, &p2, &session.session_id, "paper", None)
        .await
        .unwrap();
    let after = common::read_log(&state, &session.session_id, &p1)
        .await
        .unwrap();

    // Earlier entries are untouched; the log only grows.
    assert_eq!(after.len(), before.len() + 1);
    assert_eq!(&after[..before.len()], &before[..]);
}

#[tokio::test]
async fn successive_reads_with_no_write_are_identical() {
    let state = common::state().await;
    let (p1, _) = common::claimed_agent(&state).await;
    let (p2, _) = common::claimed_agent(&state).await;

    let session = common::create_session(
        &state,
        &p1,
        "rps.v1",
        &[("player_1", Some(p1.as_str())), ("player_2", Some(p2.as_str()))],
    )
    .await
    .unwrap();
    common::submit(&state, &p1, &session.session_id, "scissors", None)
        .await
        .unwrap();

    let first = common::read(&state, &session.session_id, &p2).await.unwrap();
    let second = common::read(&state, &session.session_id, &p2).await.unwrap();
    assert_eq!(first.state, second.state);
    assert_eq!(first.tick, second.tick);
    assert_eq!(first.legal_actions, second.legal_actions);

    let log_a = common::read_log(&state, &session.session_id, &p2)
        .await
        .unwrap();
    let log_b = common::read_log(&state, &session.session_id, &p2)
        .await
        .unwrap();
    assert_eq!(log_a, log_b);
}

#[tokio::test]
async fn log_is_participants_only() {
    let state = common::state().await;
    let (p1, _) = common::claimed_agent(&state).await;
    let (p2, _) = common::claimed_agent(&state).await;
    let (outsider, _) = common::claimed_agent(&state).await;

    let session = common::create_session(
        &state,
        &p1,
        "rps.v1",
        &[("player_1", Some(p1.as_str())), ("player_2", Some(p2.as_str()))],
    )
    .await
    .unwrap();

    let err = common::read_log(&state, &session.session_id, &outsider)
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::Forbidden);

    let err = common::read_log(&state, "no-such-session", &p1)
        .await
        .unwrap_err();
    common::assert_code(&err, ErrorCode::NotFound);
}

#[tokio::test]
async fn log_records_the_acting_role_and_agent() {
    let state = common::state().await;
    let (p1, _) = common::claimed_agent(&state).await;
    let (p2, _) = common::claimed_agent(&state).await;

    let session = common::create_session(
        &state,
        &p1,
        "rps.v1",
        &[("player_1", Some(p1.as_str())), ("player_2", Some(p2.as_str()))],
    )
    .await
    .unwrap();

    common::submit(&state, &p2, &session.session_id, "paper", None)
        .await
        .unwrap();

    let log = common::read_log(&state, &session.session_id, &p1)
        .await
        .unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].agent_id, p2);
    assert_eq!(log[0].role, "player_2");
    assert_eq!(log[0].action, "paper");
    assert_eq!(log[0].tick, 0);
}
