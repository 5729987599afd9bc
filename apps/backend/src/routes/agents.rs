//! Identity routes: register and claim. Neither is bearer-authenticated —
//! these are the endpoints that mint bearers.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::identity::IdentityService;
use crate::state::app_state::AppState;

#[derive(Serialize)]
struct RegisterAgentResponse {
    agent_id: String,
    claim_token: String,
}

#[derive(Deserialize)]
struct ClaimAgentRequest {
    claim_token: String,
}

#[derive(Serialize)]
struct ClaimAgentResponse {
    agent_id: String,
    token: String,
}

/// POST /agents
async fn register_agent(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let registered = with_txn(&app_state, |txn| {
        Box::pin(async move { IdentityService.register(txn).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(RegisterAgentResponse {
        agent_id: registered.agent_id,
        claim_token: registered.claim_secret,
    }))
}

/// POST /agents/{agent_id}/claim
async fn claim_agent(
    path: web::Path<String>,
    body: web::Json<ClaimAgentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let agent_id = path.into_inner();
    let claim_token = body.into_inner().claim_token;

    let claimed = with_txn(&app_state, move |txn| {
        Box::pin(async move { IdentityService.claim(txn, &agent_id, &claim_token).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(ClaimAgentResponse {
        agent_id: claimed.agent_id,
        token: claimed.bearer_secret,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/agents", web::post().to(register_agent))
        .route("/agents/{agent_id}/claim", web::post().to(claim_agent));
}
