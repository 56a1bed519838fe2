/*
 * Responsibility
 * - Persistence behind the TodoStore trait (in-memory / PostgreSQL)
 */
pub mod error;
pub mod memory;
pub mod todo_repo;
pub mod todo_store;

pub use error::StoreError;
pub use memory::MemoryTodoStore;
pub use todo_repo::PgTodoStore;
pub use todo_store::{TodoItem, TodoStore, TodoUpdate};
