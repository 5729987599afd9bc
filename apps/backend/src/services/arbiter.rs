//! The arbiter: accept or reject one action submission.
//!
//! Every submission runs the same sequence — authenticate (done upstream by
//! the bearer extractor), load, authorize, liveness, concurrency
//! precondition, legality, transition, commit, notify — under the session's
//! exclusive lock, with the load-through-commit window inside one
//! transaction. Different sessions proceed in parallel; submissions against
//! the same session serialize on the lock, and the store's tick
//! compare-and-set backs the lock up.

use sea_orm::DatabaseTransaction;
use tracing::info;
use ulid::Ulid;

use crate::db::txn::with_txn;
use crate::domain::{TemplateRegistry, TurnStyle};
use crate::entities::sessions::SessionStatus;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::actions::{self, ActionAppend};
use crate::repos::{participants, sessions};
use crate::state::app_state::AppState;

/// What the submitter gets back: the advanced tick, their filtered view of
/// the successor state, and the (possibly terminal) status.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub tick: i64,
    pub state: serde_json::Value,
    pub status: SessionStatus,
}

#[derive(Default)]
pub struct Arbiter;

impl Arbiter {
    /// Accept or reject `(agent, session, action)`.
    ///
    /// A submission past lock acquisition is not cancellable: the transaction
    /// commits or rolls back regardless of the client hanging up. The change
    /// event is published after commit, before the lock is released, so
    /// watchers observe events in commit order.
    pub async fn submit_action(
        &self,
        state: &AppState,
        agent_id: &str,
        session_id: &str,
        action: &str,
        expected_tick: Option<i64>,
    ) -> Result<SubmissionOutcome, AppError> {
        let _guard = state.locks.acquire(session_id).await;

        let templates = state.templates.clone();
        let agent = agent_id.to_string();
        let session = session_id.to_string();
        let submitted = action.to_string();

        let outcome = with_txn(state, move |txn| {
            Box::pin(async move {
                arbitrate(txn, &templates, &agent, &session, &submitted, expected_tick).await
            })
        })
        .await?;

        // Outside the transaction: a lost notification never rolls back a
        // commit. Still inside the lock: per-session event order matches
        // commit order.
        state.watchers.notify(session_id);

        Ok(outcome)
    }
}

async fn arbitrate(
    txn: &DatabaseTransaction,
    templates: &TemplateRegistry,
    agent_id: &str,
    session_id: &str,
    action: &str,
    expected_tick: Option<i64>,
) -> Result<SubmissionOutcome, AppError> {
    // Load
    let session = sessions::require_session(txn, session_id).await?;

    // Authorize
    let participant = participants::find_for_agent(txn, session_id, agent_id)
        .await?
        .ok_or_else(|| AppError::forbidden("not a participant in this session"))?;
    let role = participant.role;

    // Liveness
    match session.status {
        SessionStatus::Completed => {
            return Err(AppError::invalid_action("session is terminal"));
        }
        SessionStatus::Waiting => {
            return Err(AppError::invalid_action("session has not started"));
        }
        SessionStatus::Active => {}
    }

    let template = templates.get(&session.template).map_err(|_| {
        AppError::internal(
            ErrorCode::DataCorruption,
            format!(
                "session references unregistered template '{}'",
                session.template
            ),
        )
    })?;

    // Concurrency precondition
    let legal = template.legal_actions(&session.state, &role);
    match template.turn_style() {
        TurnStyle::Sequential => {
            let expected = expected_tick.ok_or_else(|| {
                AppError::invalid_request("expected_tick is required for this template")
            })?;
            if expected != session.tick {
                return Err(AppError::conflict(format!(
                    "tick mismatch: expected {expected}, current is {}",
                    session.tick
                )));
            }
        }
        TurnStyle::Simultaneous => {
            // expected_tick is ignored; an exhausted action set is the
            // duplicate-submission signal.
            if legal.is_empty() {
                return Err(AppError::already_acted(
                    "no legal actions for this role in the current phase",
                ));
            }
        }
    }

    // Legality
    if !legal.iter().any(|a| a == action) {
        return Err(AppError::invalid_action(format!(
            "action '{action}' is not legal for role '{role}'"
        )));
    }

    // Transition. The template already vouched for this action via
    // legal_actions; a failure here is a template bug, but the client still
    // sees it as an invalid action.
    let new_state = template
        .apply_action(&session.state, &role, action)
        .map_err(|e| AppError::invalid_action(e.to_string()))?;

    let new_status = if template.is_terminal(&new_state) {
        SessionStatus::Completed
    } else {
        SessionStatus::Active
    };

    // Commit: session row and log entry land as one unit.
    let updated = sessions::advance(txn, session_id, session.tick, &new_state, new_status).await?;
    actions::append(
        txn,
        ActionAppend {
            action_id: Ulid::new().to_string(),
            session_id: session_id.to_string(),
            agent_id: agent_id.to_string(),
            role: role.clone(),
            action: action.to_string(),
            tick: session.tick,
        },
    )
    .await?;

    info!(
        session_id,
        agent_id,
        role = %role,
        action,
        tick = updated.tick,
        status = ?updated.status,
        "action accepted"
    );

    let view = template.view_state(&updated.state, &role);
    Ok(SubmissionOutcome {
        tick: updated.tick,
        state: view.to_document()?,
        status: updated.status,
    })
}
