//! The todo resource: validation and lifecycle rules over an injected store.
//!
//! # Design
//! `TodoResource` owns no state of its own. It resolves identifiers, validates
//! payloads and decides completion timestamps, then hands single-document
//! operations to the `TodoStore`. Identifiers are resolved before payloads
//! are validated, so a malformed id always yields `NotFound`.

use std::sync::Arc;

use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::TodoError;
use crate::store::TodoStore;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

#[derive(Clone)]
pub struct TodoResource {
    store: Arc<dyn TodoStore>,
    clock: Arc<dyn Clock>,
}

impl TodoResource {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn TodoStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn create(&self, input: CreateTodo) -> Result<Todo, TodoError> {
        let new = input.validate()?;
        let todo = self.store.insert(new).await?;
        debug!(id = %todo.id, "created todo");
        Ok(todo)
    }

    pub async fn list(&self) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Todo, TodoError> {
        let id = TodoId::parse(id)?;
        self.store
            .find_by_id(&id)
            .await?
            .ok_or(TodoError::NotFound)
    }

    pub async fn delete(&self, id: &str) -> Result<Todo, TodoError> {
        let id = TodoId::parse(id)?;
        let todo = self
            .store
            .delete_by_id(&id)
            .await?
            .ok_or(TodoError::NotFound)?;
        debug!(%id, "deleted todo");
        Ok(todo)
    }

    pub async fn update(&self, id: &str, input: UpdateTodo) -> Result<Todo, TodoError> {
        let id = TodoId::parse(id)?;
        let changes = input.into_changes(self.clock.now_millis())?;
        let todo = self
            .store
            .update_by_id(&id, changes)
            .await?
            .ok_or(TodoError::NotFound)?;
        debug!(%id, completed = todo.is_completed(), "updated todo");
        Ok(todo)
    }
}
