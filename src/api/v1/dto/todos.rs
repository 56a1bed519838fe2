/*
 * Responsibility
 * - Todos request/response DTOs (camelCase on the wire)
 * - validate() for shape checks before anything reaches the store
 */
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{TodoItem, TodoUpdate};
use crate::services::todos::NewTodo;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: String,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.due_date.trim().is_empty() {
            return Err("dueDate is required");
        }

        Ok(())
    }

    pub fn into_new_todo(self) -> NewTodo {
        NewTodo {
            name: self.name,
            due_date: self.due_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub name: String,
    pub due_date: String,
    pub done: bool,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name cannot be empty");
        }
        if self.due_date.trim().is_empty() {
            return Err("dueDate cannot be empty");
        }

        Ok(())
    }

    pub fn into_update(self) -> TodoUpdate {
        TodoUpdate {
            name: self.name,
            due_date: self.due_date,
            done: self.done,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub todo_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub due_date: String,
    pub done: bool,
    pub created_at: String, // RFC 3339, millisecond precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl From<TodoItem> for TodoResponse {
    fn from(item: TodoItem) -> Self {
        Self {
            todo_id: item.todo_id,
            user_id: item.user_id,
            name: item.name,
            due_date: item.due_date,
            done: item.done,
            created_at: item.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            attachment_url: item.attachment_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub items: Vec<TodoResponse>,
}

#[derive(Debug, Serialize)]
pub struct TodoItemResponse {
    pub item: TodoResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlResponse {
    pub upload_url: String,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Buy milk", "2024-01-01", Ok(()))]
    #[case("   ", "2024-01-01", Err("name is required"))]
    #[case("Buy milk", "", Err("dueDate is required"))]
    fn create_request_validation(
        #[case] name: &str,
        #[case] due_date: &str,
        #[case] expected: Result<(), &'static str>,
    ) {
        let req = CreateTodoRequest {
            name: name.to_string(),
            due_date: due_date.to_string(),
        };

        assert_eq!(req.validate(), expected);
    }

    #[test]
    fn update_request_requires_all_fields() {
        let missing_done = serde_json::from_str::<UpdateTodoRequest>(
            r#"{ "name": "Buy milk", "dueDate": "2024-01-01" }"#,
        );

        assert!(missing_done.is_err());
    }
}
