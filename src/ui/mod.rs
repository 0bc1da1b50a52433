//! Interactive layer: the dialog state machine plus its Ratatui shell.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::{App, Mode};
pub use forms::{BookForm, DeleteCandidate, EditTarget};
pub use terminal::run_app;
