use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::services::identity::IdentityService;
use crate::state::app_state::AppState;

/// The authenticated agent behind the presented bearer secret.
///
/// Authentication is the arbiter's step one and runs here, before any
/// handler body: no resolvable bearer, no non-401 response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentAgent {
    pub agent_id: String,
}

impl FromRequest for CurrentAgent {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = AuthToken::extract(&req).await?;

            let app_state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
                AppError::internal(
                    crate::errors::ErrorCode::Internal,
                    "AppState not available in request",
                )
            })?;

            let db = require_db(app_state)?;
            let agent = IdentityService
                .resolve(db, &token.token)
                .await?
                .ok_or_else(|| {
                    AppError::unauthorized("bearer secret does not resolve to an agent")
                })?;

            Ok(CurrentAgent {
                agent_id: agent.agent_id,
            })
        })
    }
}
