//! Bearer token check → `AuthCtx` in request extensions.
//!
//! Runs the same `Authorizer` as `/authorize`: an Allow decision lets the
//! request through with its principal as the caller, Deny ends it with 401.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Put the access check in front of every route of `router`.
///
/// ```ignore
/// let todos = Router::new().route("/todos", get(list_todos));
/// let todos = middleware::auth::access::apply(todos, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn cannot take a State extractor in axum 0.8, hence from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = match authorization_header(req.headers()) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(reason = err.kind(), error = %err, "user not authorized");
            return Err(AppError::Unauthorized);
        }
    };

    let decision = state.authorizer.authorize(authorization).await;

    let Some(user_id) = decision.allowed_principal() else {
        return Err(AppError::Unauthorized);
    };

    // middleware → extractor handoff
    req.extensions_mut().insert(AuthCtx::new(user_id));

    Ok(next.run(req).await)
}

/// Present but not visible ASCII is malformed, not missing.
fn authorization_header(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader))
        .transpose()
}
