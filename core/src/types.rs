//! Domain types and wire DTOs for the todo API.
//!
//! # Design
//! Completion state is an enum, so a todo can never be completed without a
//! timestamp or carry a timestamp while open. The flat document seen on the
//! wire (`completed` + `completedAt`) is produced by converting through
//! `TodoDocument`, which rejects inconsistent documents on the way in.
//!
//! Request payloads keep client-supplied values as raw JSON. Whether `text`
//! is a usable string is a validation question answered by this crate, not a
//! body-decoding failure answered by the transport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{InconsistentCompletion, InvalidId, ValidationError};

/// Store-assigned identifier of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier received from a caller. Structural validity says
    /// nothing about whether a todo with this id exists.
    pub fn parse(raw: &str) -> Result<Self, InvalidId> {
        Uuid::try_parse(raw)
            .map(Self)
            .map_err(|_| InvalidId(raw.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TodoId {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Whether a todo is done, and since when (epoch milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    #[default]
    Open,
    Closed { at: i64 },
}

impl Completion {
    /// Completion requested by a submitted `completed` value. Only a literal
    /// `true` closes the todo; closing always stamps `now`, even when the
    /// todo was already closed.
    pub fn from_flag(flag: &Value, now: i64) -> Self {
        match flag {
            Value::Bool(true) => Completion::Closed { at: now },
            _ => Completion::Open,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Completion::Closed { .. })
    }

    pub fn completed_at(&self) -> Option<i64> {
        match self {
            Completion::Open => None,
            Completion::Closed { at } => Some(*at),
        }
    }
}

/// A single stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TodoDocument", try_from = "TodoDocument")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completion: Completion,
}

impl Todo {
    pub fn open(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completion: Completion::Open,
        }
    }

    pub fn closed(id: TodoId, text: impl Into<String>, at: i64) -> Self {
        Self {
            id,
            text: text.into(),
            completion: Completion::Closed { at },
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_completed()
    }

    pub fn completed_at(&self) -> Option<i64> {
        self.completion.completed_at()
    }

    /// Apply already-validated changes. Fields left as `None` are untouched.
    pub fn apply(&mut self, changes: TodoChanges) {
        if let Some(text) = changes.text {
            self.text = text;
        }
        if let Some(completion) = changes.completion {
            self.completion = completion;
        }
    }
}

/// Flat document shape of a todo as stored and served.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: TodoId,
    text: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    completed_at: Option<i64>,
}

impl From<Todo> for TodoDocument {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            completed: todo.completion.is_completed(),
            completed_at: todo.completion.completed_at(),
            text: todo.text,
        }
    }
}

impl TryFrom<TodoDocument> for Todo {
    type Error = InconsistentCompletion;

    fn try_from(doc: TodoDocument) -> Result<Self, Self::Error> {
        let completion = match (doc.completed, doc.completed_at) {
            (false, None) => Completion::Open,
            (true, Some(at)) => Completion::Closed { at },
            _ => return Err(InconsistentCompletion),
        };
        Ok(Self {
            id: doc.id,
            text: doc.text,
            completion,
        })
    }
}

/// Validated input for inserting a todo. New todos always start open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub text: String,
}

/// Validated partial update, ready to be applied atomically by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub text: Option<String>,
    pub completion: Option<Completion>,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub text: Value,
}

impl CreateTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Value::String(text.into()),
        }
    }

    pub fn validate(&self) -> Result<NewTodo, ValidationError> {
        Ok(NewTodo {
            text: validate_text(&self.text)?,
        })
    }
}

/// Request payload for updating a todo. Only `text` and `completed` are
/// recognised; any other key in the body is ignored. A key that is present
/// with a `null` value still counts as provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(
        default,
        deserialize_with = "provided",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<Value>,
    #[serde(
        default,
        deserialize_with = "provided",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<Value>,
}

impl UpdateTodo {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(Value::String(text.into()));
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(Value::Bool(completed));
        self
    }

    /// Resolve the submitted fields into changes, stamping `now` when the
    /// todo gets closed.
    pub fn into_changes(self, now: i64) -> Result<TodoChanges, ValidationError> {
        let text = self.text.as_ref().map(validate_text).transpose()?;
        let completion = self
            .completed
            .as_ref()
            .map(|flag| Completion::from_flag(flag, now));
        Ok(TodoChanges { text, completion })
    }
}

fn provided<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn validate_text(raw: &Value) -> Result<String, ValidationError> {
    let text = raw.as_str().ok_or(ValidationError::TextNotString)?.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text.to_string())
}

/// `{"todo": {...}}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoEnvelope {
    pub todo: Todo,
}

/// `{"todos": [...]}` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}
