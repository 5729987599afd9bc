//! Session routes: create, list, join, read state, submit actions, read the
//! log, and the SSE change-event stream.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::db::txn::with_txn;
use crate::entities::sessions::SessionStatus;
use crate::error::AppError;
use crate::extractors::CurrentAgent;
use crate::notify::{SessionChanged, SessionWatchers};
use crate::repos::{participants, sessions as sessions_repo};
use crate::services::arbiter::Arbiter;
use crate::services::sessions::SessionService;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
struct CreateSessionRequest {
    template: String,
    /// role -> agent_id, `null` for an open slot
    participants: BTreeMap<String, Option<String>>,
}

#[derive(Serialize)]
struct CreateSessionResponse {
    session_id: String,
    template: String,
    status: SessionStatus,
    /// Present while the session has open slots: the id a joiner needs.
    #[serde(skip_serializing_if = "Option::is_none")]
    join_hint: Option<String>,
}

#[derive(Serialize)]
struct SessionSummary {
    session_id: String,
    template: String,
    status: SessionStatus,
    tick: i64,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

#[derive(Serialize)]
struct SessionListResponse {
    sessions: Vec<SessionSummary>,
}

#[derive(Deserialize)]
struct JoinSessionRequest {
    role: String,
}

#[derive(Serialize)]
struct JoinSessionResponse {
    session_id: String,
    status: SessionStatus,
}

#[derive(Serialize)]
struct SessionStateResponse {
    session_id: String,
    template: String,
    status: SessionStatus,
    tick: i64,
    state: serde_json::Value,
    your_role: String,
    legal_actions: Vec<String>,
}

#[derive(Deserialize)]
struct SubmitActionRequest {
    action: String,
    /// Required for sequential templates, ignored for simultaneous ones.
    expected_tick: Option<i64>,
}

#[derive(Serialize)]
struct SubmitActionResponse {
    tick: i64,
    state: serde_json::Value,
    status: SessionStatus,
}

#[derive(Serialize)]
struct ActionEntryResponse {
    tick: i64,
    role: String,
    agent_id: String,
    action: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

#[derive(Serialize)]
struct ActionLogResponse {
    actions: Vec<ActionEntryResponse>,
}

/// POST /sessions
async fn create_session(
    agent: CurrentAgent,
    body: web::Json<CreateSessionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let templates = app_state.templates.clone();
    let caller = agent.agent_id;

    let (session, _participants) = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            SessionService
                .create_session(
                    txn,
                    &templates,
                    &caller,
                    &request.template,
                    &request.participants,
                )
                .await
        })
    })
    .await?;

    let join_hint =
        (session.status == SessionStatus::Waiting).then(|| session.session_id.clone());

    Ok(HttpResponse::Created().json(CreateSessionResponse {
        session_id: session.session_id,
        template: session.template,
        status: session.status,
        join_hint,
    }))
}

/// GET /sessions
async fn list_sessions(
    agent: CurrentAgent,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let caller = agent.agent_id;
    let listed = with_txn(&app_state, move |txn| {
        Box::pin(async move { SessionService.list(txn, &caller).await })
    })
    .await?;

    let sessions = listed
        .into_iter()
        .map(|s| SessionSummary {
            session_id: s.session_id,
            template: s.template,
            status: s.status,
            tick: s.tick,
            created_at: s.created_at,
            updated_at: s.updated_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(SessionListResponse { sessions }))
}

/// POST /sessions/{session_id}/join
async fn join_session(
    agent: CurrentAgent,
    path: web::Path<String>,
    body: web::Json<JoinSessionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let role = body.into_inner().role;
    let templates = app_state.templates.clone();
    let caller = agent.agent_id;
    let sid = session_id.clone();

    let session = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            SessionService
                .join(txn, &templates, &sid, &caller, &role)
                .await
        })
    })
    .await?;

    // A join that fills the last slot changes what every participant can do.
    if session.status == SessionStatus::Active {
        app_state.watchers.notify(&session_id);
    }

    Ok(HttpResponse::Ok().json(JoinSessionResponse {
        session_id: session.session_id,
        status: session.status,
    }))
}

/// GET /sessions/{session_id}/state
async fn read_state(
    agent: CurrentAgent,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let templates = app_state.templates.clone();
    let caller = agent.agent_id;

    let view = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            SessionService
                .read(txn, &templates, &session_id, &caller)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(SessionStateResponse {
        session_id: view.session_id,
        template: view.template,
        status: view.status,
        tick: view.tick,
        state: view.state,
        your_role: view.your_role,
        legal_actions: view.legal_actions,
    }))
}

/// POST /sessions/{session_id}/actions
async fn submit_action(
    agent: CurrentAgent,
    path: web::Path<String>,
    body: web::Json<SubmitActionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let request = body.into_inner();

    if request.action.is_empty() {
        return Err(AppError::invalid_request("action must not be empty"));
    }

    let outcome = Arbiter
        .submit_action(
            &app_state,
            &agent.agent_id,
            &session_id,
            &request.action,
            request.expected_tick,
        )
        .await?;

    Ok(HttpResponse::Ok().json(SubmitActionResponse {
        tick: outcome.tick,
        state: outcome.state,
        status: outcome.status,
    }))
}

/// GET /sessions/{session_id}/log
async fn read_log(
    agent: CurrentAgent,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let caller = agent.agent_id;

    let entries = with_txn(&app_state, move |txn| {
        Box::pin(async move { SessionService.read_log(txn, &session_id, &caller).await })
    })
    .await?;

    let actions = entries
        .into_iter()
        .map(|e| ActionEntryResponse {
            tick: e.tick,
            role: e.role,
            agent_id: e.agent_id,
            action: e.action,
            created_at: e.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ActionLogResponse { actions }))
}

/// SSE body: one `data: {"session_id":...}` frame per change event.
/// Unsubscribes itself when the connection goes away.
struct SessionEventStream {
    session_id: String,
    token: Uuid,
    watchers: Arc<SessionWatchers>,
    rx: UnboundedReceiver<SessionChanged>,
}

impl Stream for SessionEventStream {
    type Item = Result<web::Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                let payload = serde_json::to_string(&event).unwrap_or_default();
                Poll::Ready(Some(Ok(web::Bytes::from(format!("data: {payload}\n\n")))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for SessionEventStream {
    fn drop(&mut self) {
        self.watchers.unsubscribe(&self.session_id, self.token);
    }
}

/// GET /sessions/{session_id}/events
///
/// Events carry no state; on receipt, re-read `GET /sessions/{id}/state`.
async fn session_events(
    agent: CurrentAgent,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();

    let sid = session_id.clone();
    let caller = agent.agent_id;
    with_txn(&app_state, move |txn| {
        Box::pin(async move {
            sessions_repo::require_session(txn, &sid).await?;
            participants::find_for_agent(txn, &sid, &caller)
                .await?
                .ok_or_else(|| AppError::forbidden("not a participant in this session"))?;
            Ok(())
        })
    })
    .await?;

    let (token, rx) = app_state.watchers.subscribe(&session_id);
    let stream = SessionEventStream {
        session_id,
        token,
        watchers: app_state.watchers.clone(),
        rx,
    };

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/sessions", web::post().to(create_session))
        .route("/sessions", web::get().to(list_sessions))
        .route("/sessions/{session_id}/join", web::post().to(join_session))
        .route("/sessions/{session_id}/state", web::get().to(read_state))
        .route("/sessions/{session_id}/actions", web::post().to(submit_action))
        .route("/sessions/{session_id}/log", web::get().to(read_log))
        .route("/sessions/{session_id}/events", web::get().to(session_events));
}
