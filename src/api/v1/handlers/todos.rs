/*
 * Responsibility
 * - /todos CRUD handlers + attachment upload URL
 * - Caller comes from AuthCtx (set by the access middleware), never from the body
 * - One TodoService call per request
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    api::v1::{
        dto::todos::{
            CreateTodoRequest, TodoItemResponse, TodoListResponse, UpdateTodoRequest,
            UploadUrlResponse,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn list_todos(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<Json<TodoListResponse>, AppError> {
    let items = state.todos.list(&auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, count = items.len(), "listed todos");

    Ok(Json(TodoListResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoItemResponse>), AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    let item = state
        .todos
        .create(&auth.user_id, req.into_new_todo())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TodoItemResponse { item: item.into() }),
    ))
}

pub async fn update_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<TodoItemResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_TODO", msg))?;

    let item = state
        .todos
        .update(todo_id, &auth.user_id, req.into_update())
        .await?;

    Ok(Json(TodoItemResponse { item: item.into() }))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.todos.delete(todo_id, &auth.user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_upload_url(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(todo_id): Path<Uuid>,
) -> Result<Json<UploadUrlResponse>, AppError> {
    let upload_url = state
        .todos
        .generate_upload_url(todo_id, &auth.user_id)
        .await?;

    Ok(Json(UploadUrlResponse { upload_url }))
}
