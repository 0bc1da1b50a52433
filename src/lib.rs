//! Core library surface for the Book List Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the in-memory book store, the domain model, and the interactive
//! application state.
pub mod models;
pub mod store;
pub mod ui;

/// The managed domain type.
pub use models::Book;

/// The in-memory collection store and its single error kind.
pub use store::{Library, StoreError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
