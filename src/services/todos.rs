//! TODO business rules on top of a `TodoStore`.
//!
//! Each call maps to exactly one store operation.
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use url::Url;
use uuid::Uuid;

use crate::repos::{StoreError, TodoItem, TodoStore, TodoUpdate};

/// Input for a new item, already validated by the API layer.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub name: String,
    pub due_date: String,
}

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    attachment_base_url: Url,
}

impl fmt::Debug for TodoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TodoService")
            .field("store", &self.store.backend_name())
            .field("attachment_base_url", &self.attachment_base_url.as_str())
            .finish()
    }
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>, attachment_base_url: Url) -> Self {
        Self {
            store,
            attachment_base_url,
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        self.store.list(user_id).await
    }

    pub async fn create(&self, user_id: &str, new: NewTodo) -> Result<TodoItem, StoreError> {
        let item = TodoItem {
            todo_id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: new.name,
            due_date: new.due_date,
            done: false,
            created_at: Utc::now(),
            attachment_url: None,
        };
        tracing::info!(user_id, todo_id = %item.todo_id, "creating todo");

        self.store.create(item).await
    }

    pub async fn update(
        &self,
        todo_id: Uuid,
        user_id: &str,
        fields: TodoUpdate,
    ) -> Result<TodoItem, StoreError> {
        tracing::info!(user_id, %todo_id, "updating todo");
        self.store.update(todo_id, user_id, fields).await
    }

    pub async fn delete(&self, todo_id: Uuid, user_id: &str) -> Result<Uuid, StoreError> {
        tracing::info!(user_id, %todo_id, "deleting todo");
        self.store.delete(todo_id, user_id).await
    }

    /// Point the item at its attachment location and return that URL for the
    /// client to upload to.
    pub async fn generate_upload_url(
        &self,
        todo_id: Uuid,
        user_id: &str,
    ) -> Result<String, StoreError> {
        let url = self.attachment_url(todo_id);
        tracing::info!(user_id, %todo_id, "generating upload url");

        let item = self.store.set_attachment(todo_id, user_id, &url).await?;
        Ok(item.attachment_url.unwrap_or(url))
    }

    fn attachment_url(&self, todo_id: Uuid) -> String {
        format!(
            "{}/{}",
            self.attachment_base_url.as_str().trim_end_matches('/'),
            todo_id
        )
    }
}
