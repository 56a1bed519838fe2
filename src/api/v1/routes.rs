/*
 * Responsibility
 * - v1 URL layout
 * - /health and /authorize are public; /todos* sits behind the access middleware
 */
use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    authorizer::authorize,
    health::health,
    todos::{create_todo, delete_todo, generate_upload_url, list_todos, update_todo},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let todos = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{todo_id}", patch(update_todo).delete(delete_todo))
        .route("/todos/{todo_id}/attachment", post(generate_upload_url));

    Router::new()
        .route("/health", get(health))
        .route("/authorize", post(authorize))
        .merge(access::apply(todos, state))
}
