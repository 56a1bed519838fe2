/*
 * Responsibility
 * - todos table access through SQLx (PgTodoStore)
 * - (user_id, todo_id) is the key: every statement filters on both
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::repos::error::StoreError;
use crate::repos::todo_store::{TodoItem, TodoStore, TodoUpdate};

const SCHEMA: &str = include_str!("../../migrations/0001_create_todos.sql");

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TodoRow {
    pub todo_id: Uuid,
    pub user_id: String,
    pub name: String,
    pub due_date: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub attachment_url: Option<String>,
}

impl From<TodoRow> for TodoItem {
    fn from(row: TodoRow) -> Self {
        Self {
            todo_id: row.todo_id,
            user_id: row.user_id,
            name: row.name,
            due_date: row.due_date,
            done: row.done,
            created_at: row.created_at,
            attachment_url: row.attachment_url,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        // Idempotent (IF NOT EXISTS)
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT
                todo_id, user_id, name, due_date, done, created_at, attachment_url
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at, todo_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TodoItem::from).collect())
    }

    async fn create(&self, item: TodoItem) -> Result<TodoItem, StoreError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            INSERT INTO todos
                (todo_id, user_id, name, due_date, done, created_at, attachment_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING
                todo_id, user_id, name, due_date, done, created_at, attachment_url
            "#,
        )
        .bind(item.todo_id)
        .bind(&item.user_id)
        .bind(&item.name)
        .bind(&item.due_date)
        .bind(item.done)
        .bind(item.created_at)
        .bind(&item.attachment_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        todo_id: Uuid,
        user_id: &str,
        fields: TodoUpdate,
    ) -> Result<TodoItem, StoreError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET
                name = $3,
                due_date = $4,
                done = $5
            WHERE todo_id = $1 AND user_id = $2
            RETURNING
                todo_id, user_id, name, due_date, done, created_at, attachment_url
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.due_date)
        .bind(fields.done)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, todo_id: Uuid, user_id: &str) -> Result<Uuid, StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE todo_id = $1 AND user_id = $2
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(todo_id)
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn set_attachment(
        &self,
        todo_id: Uuid,
        user_id: &str,
        attachment_url: &str,
    ) -> Result<TodoItem, StoreError> {
        let row = sqlx::query_as::<_, TodoRow>(
            r#"
            UPDATE todos
            SET attachment_url = $3
            WHERE todo_id = $1 AND user_id = $2
            RETURNING
                todo_id, user_id, name, due_date, done, created_at, attachment_url
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .bind(attachment_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(row.into())
    }
}
