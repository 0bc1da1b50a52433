use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Form state for the add/edit modal. The buffer lives inside the active
/// dialog mode, so it is created fresh when the dialog opens and dropped
/// when the dialog closes.
#[derive(Default, Clone)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub(crate) active: BookField,
}

/// Fields available within the book form, used to drive focus management.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BookField {
    #[default]
    Title,
    Author,
}

impl BookForm {
    /// Populate the form from an existing book when entering edit mode.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            active: BookField::Title,
        }
    }

    /// Swap focus between the title and author fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Title,
        };
    }

    /// Append a character to the active field. Control characters are
    /// ignored so terminal escape fragments never end up in a record.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
        }
        true
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
        }
    }

    /// Turn the buffer into a record. This layer performs no content
    /// validation: blank fields are legal, so submission always succeeds.
    pub fn into_book(self) -> Book {
        Book {
            title: self.title,
            author: self.author,
        }
    }

    /// Render a single styled line for the modal form.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let (value, is_active) = match field {
            BookField::Title => (&self.title, self.active == BookField::Title),
            BookField::Author => (&self.author, self.active == BookField::Author),
        };

        let display = if value.is_empty() {
            "<empty>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of the requested field, used for cursor placement.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
        }
    }
}

/// Marker distinguishing "creating a new book" from "editing the book at a
/// captured position". The position is captured when the edit dialog opens
/// and, because no other dialog can open while this one is active, it is
/// still valid when the form is submitted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(usize),
}

/// State for the delete confirmation dialog: the position captured at the
/// moment the dialog opened plus a snapshot of the book for display. The
/// confirm action deletes at exactly this index, never a re-derived one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCandidate {
    pub index: usize,
    pub book: Book,
}

#[cfg(test)]
mod tests {
    use super::{BookField, BookForm};
    use crate::models::Book;

    #[test]
    fn tab_cycles_between_the_two_fields() {
        let mut form = BookForm::default();
        assert_eq!(form.active, BookField::Title);
        form.toggle_field();
        assert_eq!(form.active, BookField::Author);
        form.toggle_field();
        assert_eq!(form.active, BookField::Title);
    }

    #[test]
    fn typing_targets_the_focused_field() {
        let mut form = BookForm::default();
        assert!(form.push_char('D'));
        form.toggle_field();
        assert!(form.push_char('H'));
        assert_eq!(form.title, "D");
        assert_eq!(form.author, "H");
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut form = BookForm::default();
        assert!(!form.push_char('\u{1b}'));
        assert!(form.title.is_empty());
    }

    #[test]
    fn backspace_edits_only_the_focused_field() {
        let mut form = BookForm::from_book(&Book::new("Dune", "Herbert"));
        form.backspace();
        assert_eq!(form.title, "Dun");
        assert_eq!(form.author, "Herbert");
    }

    #[test]
    fn blank_fields_still_produce_a_record() {
        let form = BookForm::default();
        let book = form.into_book();
        assert_eq!(book, Book::new("", ""));
    }
}
