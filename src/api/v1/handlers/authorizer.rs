/*
 * Responsibility
 * - POST /authorize: gateway custom-authorizer contract
 * - Always 200 with a decision document; Deny is a normal answer, not an error
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::authorizer::AuthorizerRequest, services::auth::AuthorizationDecision,
    state::AppState,
};

pub async fn authorize(
    State(state): State<AppState>,
    Json(req): Json<AuthorizerRequest>,
) -> Json<AuthorizationDecision> {
    tracing::debug!(
        event_type = req.event_type.as_deref().unwrap_or("TOKEN"),
        method_arn = req.method_arn.as_deref().unwrap_or("-"),
        "authorizing a user"
    );

    let decision = state
        .authorizer
        .authorize(req.authorization_token.as_deref())
        .await;

    Json(decision)
}
