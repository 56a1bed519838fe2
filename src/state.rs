/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 *   - todos: TodoService over the configured store, authorizer: bearer verification
 * - Cloned per request (everything inside is behind Arc)
 */
use std::sync::Arc;

use crate::services::{auth::Authorizer, todos::TodoService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub todos: Arc<TodoService>,
    pub authorizer: Arc<Authorizer>,
}

impl AppState {
    pub fn new(todos: Arc<TodoService>, authorizer: Arc<Authorizer>) -> Self {
        Self { todos, authorizer }
    }
}
