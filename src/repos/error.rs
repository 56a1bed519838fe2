/*
 * Responsibility
 * - What the store layer reports upwards
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    // No item with that id owned by the caller.
    #[error("todo not found")]
    NotFound,
    #[error("db error")]
    Db(#[from] sqlx::Error),
}
