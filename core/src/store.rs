//! Persistence collaborator for todos.
//!
//! # Design
//! `TodoStore` is the minimal document-store contract the resource needs.
//! Identifiers arrive already parsed as `TodoId`, so a store never has to
//! cope with malformed ids. Every method is a single-document operation and
//! implementations must make each one atomic; `update_by_id` in particular
//! is a read-modify-write that must not interleave with other writers.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::types::{NewTodo, Todo, TodoChanges, TodoId};

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Store a new open todo under a freshly assigned id.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Remove a todo, returning it as it was just before removal.
    async fn delete_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError>;

    /// Apply `changes` and return the todo as it is afterwards.
    async fn update_by_id(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError>;
}

/// Process-local store backed by a map behind an async `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    todos: RwLock<HashMap<TodoId, Todo>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `todos`, keeping their ids.
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let todos = todos.into_iter().map(|todo| (todo.id, todo)).collect();
        Self {
            todos: RwLock::new(todos),
        }
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let todo = Todo::open(TodoId::new(), todo.text);
        self.todos.write().await.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_all(&self) -> Result<Vec<Todo>, StoreError> {
        Ok(self.todos.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.read().await.get(id).cloned())
    }

    async fn delete_by_id(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        Ok(self.todos.write().await.remove(id))
    }

    async fn update_by_id(
        &self,
        id: &TodoId,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, StoreError> {
        let mut todos = self.todos.write().await;
        Ok(todos.get_mut(id).map(|todo| {
            todo.apply(changes);
            todo.clone()
        }))
    }
}
