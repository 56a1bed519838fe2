//! Store interface for TODO items.
//!
//! Every operation is scoped by `user_id`: an item is only visible to, and only
//! mutable by, the user that owns it.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::repos::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub todo_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub due_date: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub attachment_url: Option<String>,
}

/// Fields replaced by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub name: String,
    pub due_date: String,
    pub done: bool,
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError>;

    async fn create(&self, item: TodoItem) -> Result<TodoItem, StoreError>;

    // `NotFound` when `user_id` owns no item `todo_id`.
    async fn update(
        &self,
        todo_id: Uuid,
        user_id: &str,
        fields: TodoUpdate,
    ) -> Result<TodoItem, StoreError>;

    // `NotFound` when `user_id` owns no item `todo_id`; other users' items are untouched.
    async fn delete(&self, todo_id: Uuid, user_id: &str) -> Result<Uuid, StoreError>;

    // Record where the attachment for `todo_id` lives.
    async fn set_attachment(
        &self,
        todo_id: Uuid,
        user_id: &str,
        attachment_url: &str,
    ) -> Result<TodoItem, StoreError>;
}
