//! Session lifecycle: create, join, read, list, read log.
//!
//! Services load their own validation data inside the transaction rather
//! than trusting caller-provided context.

use std::collections::{BTreeMap, HashSet};

use sea_orm::DatabaseTransaction;
use tracing::info;
use ulid::Ulid;

use crate::domain::TemplateRegistry;
use crate::entities::sessions::SessionStatus;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::actions::{self, ActionEntry};
use crate::repos::agents;
use crate::repos::participants::{self, Participant};
use crate::repos::sessions::{self, Session};

/// What a participant sees when reading a session: the role-filtered state
/// document plus their own acting surface.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub session_id: String,
    pub template: String,
    pub status: SessionStatus,
    pub tick: i64,
    pub state: serde_json::Value,
    pub your_role: String,
    pub legal_actions: Vec<String>,
}

#[derive(Default)]
pub struct SessionService;

impl SessionService {
    /// Create a session from a participants map of `role -> agent_id | None`.
    ///
    /// The map must mention exactly the template's roles; `None` marks an
    /// open slot. The caller must be among the bound agents.
    pub async fn create_session(
        &self,
        txn: &DatabaseTransaction,
        templates: &TemplateRegistry,
        caller_agent_id: &str,
        template_id: &str,
        participants_map: &BTreeMap<String, Option<String>>,
    ) -> Result<(Session, Vec<Participant>), AppError> {
        let template = templates.get(template_id)?;

        let required: HashSet<&str> = template.roles().iter().copied().collect();
        let provided: HashSet<&str> = participants_map.keys().map(String::as_str).collect();
        if required != provided {
            let missing: Vec<&str> = required.difference(&provided).copied().collect();
            let extra: Vec<&str> = provided.difference(&required).copied().collect();
            return Err(AppError::invalid_request(format!(
                "participants must cover the template roles exactly (missing: {missing:?}, unknown: {extra:?})"
            )));
        }

        let bound: Vec<(&str, &str)> = participants_map
            .iter()
            .filter_map(|(role, agent)| agent.as_deref().map(|a| (role.as_str(), a)))
            .collect();

        let distinct_agents: HashSet<&str> = bound.iter().map(|(_, a)| *a).collect();
        if distinct_agents.len() != bound.len() {
            return Err(AppError::invalid_request(
                "an agent may hold at most one role in a session",
            ));
        }

        if !bound.iter().any(|(_, a)| *a == caller_agent_id) {
            return Err(AppError::forbidden(
                "caller must be one of the listed participants",
            ));
        }

        for (_, agent_id) in &bound {
            agents::require_agent(txn, agent_id).await?;
        }

        let status = if bound.len() == template.roles().len() {
            SessionStatus::Active
        } else {
            SessionStatus::Waiting
        };

        let session_id = Ulid::new().to_string();
        let initial_state = template.initial_state();
        let session =
            sessions::create_session(txn, &session_id, template_id, &initial_state, status).await?;

        let mut created = Vec::with_capacity(bound.len());
        for (role, agent_id) in &bound {
            created.push(participants::add(txn, &session_id, agent_id, role).await?);
        }

        info!(
            session_id = %session.session_id,
            template = template_id,
            status = ?session.status,
            participants = created.len(),
            "session created"
        );

        Ok((session, created))
    }

    /// Bind an open role to `agent_id`. Only valid while the session is
    /// waiting; filling the last open slot flips the session active.
    pub async fn join(
        &self,
        txn: &DatabaseTransaction,
        templates: &TemplateRegistry,
        session_id: &str,
        agent_id: &str,
        role: &str,
    ) -> Result<Session, AppError> {
        let session = sessions::require_session(txn, session_id).await?;

        if session.status != SessionStatus::Waiting {
            return Err(AppError::forbidden("session is not accepting joins"));
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

        if !template.roles().contains(&role) {
            return Err(AppError::invalid_request(format!(
                "role '{role}' is not part of template '{}'",
                session.template
            )));
        }

        let existing = participants::find_all_by_session(txn, session_id).await?;
        if existing.iter().any(|p| p.agent_id == agent_id) {
            return Err(AppError::forbidden(
                "agent is already bound to a role in this session",
            ));
        }
        if existing.iter().any(|p| p.role == role) {
            return Err(AppError::conflict(format!("role '{role}' is already filled")));
        }

        participants::add(txn, session_id, agent_id, role).await?;

        let session = if existing.len() + 1 == template.roles().len() {
            sessions::set_status(txn, session_id, SessionStatus::Active).await?
        } else {
            session
        };

        info!(
            session_id,
            agent_id,
            role,
            status = ?session.status,
            "agent joined session"
        );

        Ok(session)
    }

    /// Read the session as seen by `agent_id`: filtered state plus the
    /// agent's current legal actions.
    pub async fn read(
        &self,
        txn: &DatabaseTransaction,
        templates: &TemplateRegistry,
        session_id: &str,
        agent_id: &str,
    ) -> Result<SessionView, AppError> {
        let session = sessions::require_session(txn, session_id).await?;
        let participant = participants::find_for_agent(txn, session_id, agent_id)
            .await?
            .ok_or_else(|| AppError::forbidden("not a participant in this session"))?;

        let template = templates.get(&session.template).map_err(|_| {
            AppError::internal(
                ErrorCode::DataCorruption,
                format!(
                    "session references unregistered template '{}'",
                    session.template
                ),
            )
        })?;

        let view = template.view_state(&session.state, &participant.role);
        let legal_actions = template.legal_actions(&session.state, &participant.role);

        Ok(SessionView {
            session_id: session.session_id,
            template: session.template,
            status: session.status,
            tick: session.tick,
            state: view.to_document()?,
            your_role: participant.role,
            legal_actions,
        })
    }

    /// Sessions the agent participates in, most recently updated first.
    pub async fn list(
        &self,
        txn: &DatabaseTransaction,
        agent_id: &str,
    ) -> Result<Vec<Session>, AppError> {
        Ok(sessions::list_for_agent(txn, agent_id).await?)
    }

    /// The append-only action log, ascending by tick. Participants only.
    pub async fn read_log(
        &self,
        txn: &DatabaseTransaction,
        session_id: &str,
        agent_id: &str,
    ) -> Result<Vec<ActionEntry>, AppError> {
        sessions::require_session(txn, session_id).await?;
        participants::find_for_agent(txn, session_id, agent_id)
            .await?
            .ok_or_else(|| AppError::forbidden("not a participant in this session"))?;

        Ok(actions::list_by_session(txn, session_id).await?)
    }
}
