#![allow(dead_code)] // each test binary uses a different slice of these helpers

use std::collections::BTreeMap;

use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::actions::ActionEntry;
use backend::repos::sessions::Session;
use backend::services::arbiter::{Arbiter, SubmissionOutcome};
use backend::services::identity::IdentityService;
use backend::services::sessions::{SessionService, SessionView};
use backend::state::AppState;

pub async fn state() -> AppState {
    backend::test_support::sqlite_state().await
}

/// Register and claim a fresh agent: `(agent_id, bearer_secret)`.
pub async fn claimed_agent(state: &AppState) -> (String, String) {
    let registered = with_txn(state, |txn| {
        Box::pin(async move { IdentityService.register(txn).await })
    })
    .await
    .expect("register agent");

    let agent_id = registered.agent_id.clone();
    let claim_secret = registered.claim_secret.clone();
    let claimed = with_txn(state, move |txn| {
        Box::pin(async move { IdentityService.claim(txn, &agent_id, &claim_secret).await })
    })
    .await
    .expect("claim agent");

    (claimed.agent_id, claimed.bearer_secret)
}

pub async fn create_session(
    state: &AppState,
    caller: &str,
    template: &str,
    participants: &[(&str, Option<&str>)],
) -> Result<Session, AppError> {
    let templates = state.templates.clone();
    let caller = caller.to_string();
    let template = template.to_string();
    let map: BTreeMap<String, Option<String>> = participants
        .iter()
        .map(|(role, agent)| (role.to_string(), agent.map(str::to_string)))
        .collect();

    with_txn(state, move |txn| {
        Box::pin(async move {
            SessionService
                .create_session(txn, &templates, &caller, &template, &map)
                .await
                .map(|(session, _)| session)
        })
    })
    .await
}

pub async fn join(
    state: &AppState,
    session_id: &str,
    agent_id: &str,
    role: &str,
) -> Result<Session, AppError> {
    let templates = state.templates.clone();
    let session_id = session_id.to_string();
    let agent_id = agent_id.to_string();
    let role = role.to_string();

    with_txn(state, move |txn| {
        Box::pin(async move {
            SessionService
                .join(txn, &templates, &session_id, &agent_id, &role)
                .await
        })
    })
    .await
}

pub async fn submit(
    state: &AppState,
    agent_id: &str,
    session_id: &str,
    action: &str,
    expected_tick: Option<i64>,
) -> Result<SubmissionOutcome, AppError> {
    Arbiter
        .submit_action(state, agent_id, session_id, action, expected_tick)
        .await
}

pub async fn read(
    state: &AppState,
    session_id: &str,
    agent_id: &str,
) -> Result<SessionView, AppError> {
    let templates = state.templates.clone();
    let session_id = session_id.to_string();
    let agent_id = agent_id.to_string();

    with_txn(state, move |txn| {
        Box::pin(async move {
            SessionService
                .read(txn, &templates, &session_id, &agent_id)
                .await
        })
    })
    .await
}

pub async fn read_log(
    state: &AppState,
    session_id: &str,
    agent_id: &str,
) -> Result<Vec<ActionEntry>, AppError> {
    let session_id = session_id.to_string();
    let agent_id = agent_id.to_string();

    with_txn(state, move |txn| {
        Box::pin(async move { SessionService.read_log(txn, &session_id, &agent_id).await })
    })
    .await
}

pub fn assert_code(err: &AppError, code: ErrorCode) {
    assert_eq!(err.code(), code, "unexpected error: {err}");
}
