//! Domain model shared by the store and the TUI. The type stays a
//! light-weight data holder so the other layers can focus on state
//! management and presentation.

use std::fmt;

/// A catalog entry. Books are immutable values: editing replaces the whole
/// record at its position rather than patching individual fields, so a
/// `Book` never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Title shown in the list and the details view.
    pub title: String,
    /// Author shown alongside the title.
    pub author: String,
}

impl Book {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Compose a `Title - Author` string that gracefully omits the hyphen if
    /// the author is blank. Used by the confirmation and details dialogs.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.author)
        }
    }
}

impl fmt::Display for Book {
    /// Display is implemented so the type plays nicely with Ratatui widgets
    /// that consume strings implicitly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}
