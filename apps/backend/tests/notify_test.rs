mod common;

#[tokio::test]
async fn every_commit_pings_subscribed_watchers() {
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

    let (_token, mut rx) = state.watchers.subscribe(&session.session_id);

    common::submit(&state, &p1, &session.session_id, "rock", None)
        .await
        .unwrap();
    common::submit(&state, &p2, &session.session_id, "paper", None)
        .await
        .unwrap();

    // One event per commit, in commit order, carrying only the session id.
    let first = rx.try_recv().unwrap();
    assert_eq!(first.session_id, session.session_id);
    let second = rx.try_recv().unwrap();
    assert_eq!(second.session_id, session.session_id);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn rejected_submissions_do_not_ping() {
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

    let (_token, mut rx) = state.watchers.subscribe(&session.session_id);

    common::submit(&state, &p1, &session.session_id, "dynamite", None)
        .await
        .unwrap_err();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn watchers_only_hear_their_own_session() {
    let state = common::state().await;
    let (p1, _) = common::claimed_agent(&state).await;
    let (p2, _) = common::claimed_agent(&state).await;

    let watched = common::create_session(
        &state,
        &p1,
        "rps.v1",
        &[("player_1", Some(p1.as_str())), ("player_2", Some(p2.as_str()))],
    )
    .await
    .unwrap();
    let other = common::create_session(
        &state,
        &p1,
        "chess.v1",
        &[("white", Some(p1.as_str())), ("black", Some(p2.as_str()))],
    )
    .await
    .unwrap();

    let (_token, mut rx) = state.watchers.subscribe(&watched.session_id);

    common::submit(&state, &p1, &other.session_id, "e2e4", Some(0))
        .await
        .unwrap();

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn a_dropped_watcher_never_blocks_commits() {
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

    let (_token, rx) = state.watchers.subscribe(&session.session_id);
    drop(rx);

    // The commit succeeds and the dead subscription is pruned.
    common::submit(&state, &p1, &session.session_id, "rock", None)
        .await
        .unwrap();
    assert_eq!(state.watchers.active_watchers(), 0);
}
