//! Todo resource rules and API client core.
//!
//! # Overview
//! `TodoResource` owns the validation and completion-lifecycle rules of a
//! todo and runs them against an injected `TodoStore`. `TodoClient` is the
//! matching host-does-IO client: it builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network.
//!
//! # Design
//! - A todo's completion is `Completion::Open` or `Completion::Closed { at }`,
//!   so `completedAt` exists exactly when `completed` is true.
//! - Identifiers are parsed into `TodoId` up front; malformed and unknown ids
//!   both surface as `TodoError::NotFound`.
//! - The store and the clock are trait objects handed in at construction, so
//!   tests swap in an `InMemoryStore` and a manual clock.

pub mod client;
pub mod clock;
pub mod error;
pub mod http;
pub mod resource;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use clock::{Clock, SystemClock};
pub use error::{ApiError, InvalidId, StoreError, TodoError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::TodoResource;
pub use store::{InMemoryStore, TodoStore};
pub use types::{
    Completion, CreateTodo, NewTodo, Todo, TodoChanges, TodoEnvelope, TodoId, TodoList, UpdateTodo,
};
