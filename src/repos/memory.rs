//! In-memory `TodoStore`, partitioned by user id.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::StoreError;
use crate::repos::todo_store::{TodoItem, TodoStore, TodoUpdate};

type Partition = HashMap<Uuid, TodoItem>;

#[derive(Clone, Debug, Default)]
pub struct MemoryTodoStore {
    partitions: Arc<RwLock<HashMap<String, Partition>>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        let partitions = self.partitions.read().await;
        let mut items: Vec<TodoItem> = partitions
            .get(user_id)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default();
        items.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.todo_id.cmp(&b.todo_id))
        });

        Ok(items)
    }

    async fn create(&self, item: TodoItem) -> Result<TodoItem, StoreError> {
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(item.user_id.clone())
            .or_default()
            .insert(item.todo_id, item.clone());

        Ok(item)
    }

    async fn update(
        &self,
        todo_id: Uuid,
        user_id: &str,
        fields: TodoUpdate,
    ) -> Result<TodoItem, StoreError> {
        let mut partitions = self.partitions.write().await;
        let item = partitions
            .get_mut(user_id)
            .and_then(|p| p.get_mut(&todo_id))
            .ok_or(StoreError::NotFound)?;

        item.name = fields.name;
        item.due_date = fields.due_date;
        item.done = fields.done;

        Ok(item.clone())
    }

    async fn delete(&self, todo_id: Uuid, user_id: &str) -> Result<Uuid, StoreError> {
        let mut partitions = self.partitions.write().await;
        partitions
            .get_mut(user_id)
            .and_then(|p| p.remove(&todo_id))
            .map(|item| item.todo_id)
            .ok_or(StoreError::NotFound)
    }

    async fn set_attachment(
        &self,
        todo_id: Uuid,
        user_id: &str,
        attachment_url: &str,
    ) -> Result<TodoItem, StoreError> {
        let mut partitions = self.partitions.write().await;
        let item = partitions
            .get_mut(user_id)
            .and_then(|p| p.get_mut(&todo_id))
            .ok_or(StoreError::NotFound)?;

        item.attachment_url = Some(attachment_url.to_string());

        Ok(item.clone())
    }
}
