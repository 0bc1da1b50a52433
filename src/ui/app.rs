use std::cmp::min;
use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::models::Book;
use crate::store::{Library, StoreError};

use super::forms::{BookField, BookForm, DeleteCandidate, EditTarget};
use super::helpers::centered_rect;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// The active dialog, with its transient state carried inside the variant.
///
/// At most one dialog exists at a time because this is a single value, and
/// closing a dialog (assigning `Normal`) drops its payload. A form buffer
/// or delete candidate can therefore never be observed outside the dialog
/// it belongs to.
pub enum Mode {
    Normal,
    AddEdit { target: EditTarget, form: BookForm },
    ConfirmDelete(DeleteCandidate),
    ViewDetails(Book),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state: the book collection, the list cursor, and the
/// dialog state machine. All user-triggered events are methods here, so the
/// whole interaction flow can be driven headless in tests.
pub struct App {
    library: Library,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    // --- event surface -----------------------------------------------------

    /// Open the add dialog with a fresh, empty form. Ignored while another
    /// dialog is open.
    pub fn open_add(&mut self) {
        if !self.is_idle() {
            return;
        }
        self.mode = Mode::AddEdit {
            target: EditTarget::New,
            form: BookForm::default(),
        };
    }

    /// Open the edit dialog for the book at `index`, seeding the form from
    /// the current record. The index is captured in the edit target and used
    /// verbatim at submit time. Ignored while another dialog is open; fails
    /// if `index` does not name a current position.
    pub fn open_edit(&mut self, index: usize) -> Result<(), StoreError> {
        if !self.is_idle() {
            return Ok(());
        }
        let book = self.book_at(index)?;
        self.mode = Mode::AddEdit {
            target: EditTarget::Existing(index),
            form: BookForm::from_book(&book),
        };
        Ok(())
    }

    /// Open the delete confirmation for the book at `index`, capturing both
    /// the position and a snapshot of the record for display. Ignored while
    /// another dialog is open; fails on an out-of-range index.
    pub fn open_delete(&mut self, index: usize) -> Result<(), StoreError> {
        if !self.is_idle() {
            return Ok(());
        }
        let book = self.book_at(index)?;
        self.mode = Mode::ConfirmDelete(DeleteCandidate { index, book });
        Ok(())
    }

    /// Open the details view for the book at `index`, capturing a snapshot.
    /// Ignored while another dialog is open; fails on an out-of-range index.
    pub fn view_details(&mut self, index: usize) -> Result<(), StoreError> {
        if !self.is_idle() {
            return Ok(());
        }
        let book = self.book_at(index)?;
        self.mode = Mode::ViewDetails(book);
        Ok(())
    }

    /// Commit the form: append for a new book, replace in place for an edit.
    /// No content validation happens here; blank fields are legal records.
    /// Ignored outside the add/edit dialog.
    pub fn submit_form(&mut self) -> Result<(), StoreError> {
        match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::AddEdit { target, form } => {
                let book = form.into_book();
                match target {
                    EditTarget::New => {
                        self.library.append(book);
                        self.selected = self.library.len() - 1;
                        self.set_status("Book added.", StatusKind::Info);
                    }
                    EditTarget::Existing(index) => {
                        // The captured index is still valid: no mutation can
                        // interleave while the dialog is open.
                        self.library.replace_at(index, book)?;
                        self.set_status("Book updated.", StatusKind::Info);
                    }
                }
                Ok(())
            }
            other => {
                self.mode = other;
                Ok(())
            }
        }
    }

    /// Discard the form and edit target. Ignored outside the add/edit dialog.
    pub fn cancel(&mut self) {
        if let Mode::AddEdit { target, .. } = &self.mode {
            let message = match target {
                EditTarget::New => "Add cancelled.",
                EditTarget::Existing(_) => "Edit cancelled.",
            };
            self.mode = Mode::Normal;
            self.set_status(message, StatusKind::Info);
        }
    }

    /// Delete at the position captured when the confirmation dialog opened.
    /// Ignored outside the confirmation dialog.
    pub fn confirm_delete(&mut self) -> Result<(), StoreError> {
        match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::ConfirmDelete(candidate) => {
                self.library.remove_at(candidate.index)?;
                self.clamp_selection();
                self.set_status("Book deleted.", StatusKind::Info);
                Ok(())
            }
            other => {
                self.mode = other;
                Ok(())
            }
        }
    }

    /// Discard the pending delete. Ignored outside the confirmation dialog.
    pub fn cancel_delete(&mut self) {
        if matches!(self.mode, Mode::ConfirmDelete(_)) {
            self.mode = Mode::Normal;
            self.set_status("Deletion cancelled.", StatusKind::Info);
        }
    }

    /// Discard the details snapshot. Ignored outside the details view.
    pub fn close_details(&mut self) {
        if matches!(self.mode, Mode::ViewDetails(_)) {
            self.mode = Mode::Normal;
        }
    }

    // --- query surface -----------------------------------------------------

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The draft form, present only while the add/edit dialog is open.
    pub fn form(&self) -> Option<&BookForm> {
        match &self.mode {
            Mode::AddEdit { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Whether the open form will append or replace, and at which position.
    pub fn edit_target(&self) -> Option<EditTarget> {
        match &self.mode {
            Mode::AddEdit { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// The book pending deletion, present only while the confirmation
    /// dialog is open.
    pub fn delete_candidate(&self) -> Option<&DeleteCandidate> {
        match &self.mode {
            Mode::ConfirmDelete(candidate) => Some(candidate),
            _ => None,
        }
    }

    /// The snapshot being displayed, present only in the details view.
    pub fn view_target(&self) -> Option<&Book> {
        match &self.mode {
            Mode::ViewDetails(book) => Some(book),
            _ => None,
        }
    }

    /// Ordered view of the whole collection.
    pub fn books(&self) -> &[Book] {
        self.library.snapshot()
    }

    /// Position of the list cursor. Always within range unless the library
    /// is empty.
    pub fn selected(&self) -> usize {
        self.selected
    }

    // --- keyboard handling -------------------------------------------------

    /// Translate a key press into an event for the current dialog mode.
    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match self.mode {
            Mode::Normal => self.handle_list_key(code),
            Mode::AddEdit { .. } => {
                self.handle_form_key(code)?;
                Ok(false)
            }
            Mode::ConfirmDelete(_) => {
                self.handle_confirm_key(code)?;
                Ok(false)
            }
            Mode::ViewDetails(_) => {
                self.handle_details_key(code);
                Ok(false)
            }
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.library.len().saturating_sub(1),
            KeyCode::Char('+') => {
                self.clear_status();
                self.open_add();
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(index) = self.current_index() {
                    self.clear_status();
                    self.open_edit(index)?;
                } else {
                    self.set_status("No book selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') => {
                if let Some(index) = self.current_index() {
                    self.clear_status();
                    self.open_delete(index)?;
                } else {
                    self.set_status("No book selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Enter => {
                if let Some(index) = self.current_index() {
                    self.clear_status();
                    self.view_details(index)?;
                } else {
                    self.set_status("No book selected.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Esc => self.cancel(),
            KeyCode::Enter => self.submit_form()?,
            KeyCode::Tab | KeyCode::BackTab => {
                if let Mode::AddEdit { form, .. } = &mut self.mode {
                    form.toggle_field();
                }
            }
            KeyCode::Backspace => {
                if let Mode::AddEdit { form, .. } = &mut self.mode {
                    form.backspace();
                }
            }
            KeyCode::Char(ch) => {
                if let Mode::AddEdit { form, .. } = &mut self.mode {
                    form.push_char(ch);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => self.cancel_delete(),
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_delete()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_details_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.close_details();
        }
    }

    // --- internals ---------------------------------------------------------

    fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Normal)
    }

    /// Snapshot the book at `index`, surfacing an out-of-range index as the
    /// integration fault it is rather than silently ignoring it.
    fn book_at(&self, index: usize) -> Result<Book, StoreError> {
        self.library.get(index).cloned().ok_or(StoreError::OutOfRange {
            index,
            len: self.library.len(),
        })
    }

    fn current_index(&self) -> Option<usize> {
        if self.library.is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.library.is_empty() {
            return;
        }
        let len = self.library.len() as isize;
        let next = (self.selected as isize + delta).clamp(0, len - 1);
        self.selected = next as usize;
    }

    /// Pull the cursor back into range after a removal shrank the list.
    fn clamp_selection(&mut self) {
        self.selected = min(self.selected, self.library.len().saturating_sub(1));
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    // --- rendering ---------------------------------------------------------

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_book_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddEdit { target, form } => {
                let title = match target {
                    EditTarget::New => "Add Book",
                    EditTarget::Existing(_) => "Edit Book",
                };
                self.draw_book_form(frame, area, title, form);
            }
            Mode::ConfirmDelete(candidate) => self.draw_confirm_delete(frame, area, candidate),
            Mode::ViewDetails(book) => self.draw_details(frame, area, book),
            Mode::Normal => {}
        }
    }

    fn draw_book_table(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message = Paragraph::new("No books yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Books"));
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new([Cell::from("Title"), Cell::from("Author")])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows = self.books().iter().enumerate().map(|(index, book)| {
            let row = Row::new([
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
            ]);
            if index == self.selected {
                row.style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        });

        let table = Table::new(
            rows,
            [Constraint::Percentage(50), Constraint::Percentage(50)],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Books ({})", self.library.len())),
        );
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddEdit { .. } => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Switch Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y/Enter]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::ViewDetails(_) => Line::from(vec![
                Span::styled("[Esc]", key_style),
                Span::raw(" Close"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[e]", key_style),
                Span::raw(" Edit   "),
                Span::styled("[-]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            Line::from(""),
            Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let (cursor_x, cursor_y) = match form.active {
            BookField::Title => {
                let prefix = "Title: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(BookField::Title) as u16,
                    inner.y,
                )
            }
            BookField::Author => {
                let prefix = "Author: ".len() as u16;
                (
                    inner.x + prefix + form.value_len(BookField::Author) as u16,
                    inner.y + 1,
                )
            }
        };
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, candidate: &DeleteCandidate) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete '{}' permanently?",
                candidate.book.display_title()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, book: &Book) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Details").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(book.title.clone()),
            ]),
            Line::from(vec![
                Span::styled("Author: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(book.author.clone()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::{App, Mode};
    use crate::models::Book;
    use crate::store::{Library, StoreError};
    use crate::ui::forms::EditTarget;
    use crossterm::event::KeyCode;

    fn app_with(books: &[(&str, &str)]) -> App {
        let library = Library::from_books(
            books
                .iter()
                .map(|(title, author)| Book::new(*title, *author))
                .collect(),
        );
        App::new(library)
    }

    fn type_into_form(app: &mut App, title: &str, author: &str) {
        for ch in title.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
        app.handle_key(KeyCode::Tab).unwrap();
        for ch in author.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    #[test]
    fn edit_replaces_exactly_the_opened_position() {
        let mut app = app_with(&[("Dune", "Herbert"), ("Hyperion", "Simmons"), ("Solaris", "Lem")]);
        app.open_edit(1).unwrap();
        assert_eq!(app.edit_target(), Some(EditTarget::Existing(1)));

        // Retype the whole form.
        app.handle_key(KeyCode::Backspace).unwrap();
        while app.form().is_some_and(|form| !form.title.is_empty()) {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        for ch in "Ubik".chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
        app.submit_form().unwrap();

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.books()[0], Book::new("Dune", "Herbert"));
        assert_eq!(app.books()[1], Book::new("Ubik", "Simmons"));
        assert_eq!(app.books()[2], Book::new("Solaris", "Lem"));
    }

    #[test]
    fn delete_removes_the_book_captured_at_open_time() {
        let mut app = app_with(&[("Dune", "Herbert"), ("Hyperion", "Simmons")]);
        app.open_delete(0).unwrap();

        let candidate = app.delete_candidate().expect("dialog is open").clone();
        assert_eq!(candidate.index, 0);
        assert_eq!(candidate.book, Book::new("Dune", "Herbert"));

        app.confirm_delete().unwrap();
        assert_eq!(app.books(), &[Book::new("Hyperion", "Simmons")]);
    }

    #[test]
    fn opening_a_second_dialog_is_ignored() {
        let mut app = app_with(&[("Dune", "Herbert"), ("Hyperion", "Simmons")]);
        app.open_delete(1).unwrap();

        // Every other open event bounces off while the confirmation is up.
        app.open_add();
        app.open_edit(0).unwrap();
        app.view_details(0).unwrap();
        assert!(matches!(app.mode(), Mode::ConfirmDelete(_)));
        assert_eq!(app.delete_candidate().unwrap().index, 1);

        app.confirm_delete().unwrap();
        assert_eq!(app.books(), &[Book::new("Dune", "Herbert")]);
    }

    #[test]
    fn cancel_leaves_the_collection_untouched() {
        let mut app = app_with(&[("Dune", "Herbert")]);
        let before: Vec<Book> = app.books().to_vec();

        app.open_add();
        type_into_form(&mut app, "Ghost", "Writer");
        app.cancel();

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.books(), before.as_slice());

        app.open_delete(0).unwrap();
        app.cancel_delete();
        assert_eq!(app.books(), before.as_slice());
    }

    #[test]
    fn add_appends_while_edit_replaces() {
        let mut app = app_with(&[("A", "X")]);
        app.open_add();
        type_into_form(&mut app, "B", "Y");
        app.submit_form().unwrap();
        assert_eq!(app.books(), &[Book::new("A", "X"), Book::new("B", "Y")]);

        let mut app = app_with(&[("A", "X")]);
        app.open_edit(0).unwrap();
        while app.form().is_some_and(|form| !form.title.is_empty()) {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Char('B')).unwrap();
        app.handle_key(KeyCode::Tab).unwrap();
        while app.form().is_some_and(|form| !form.author.is_empty()) {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Char('Y')).unwrap();
        app.submit_form().unwrap();
        assert_eq!(app.books(), &[Book::new("B", "Y")]);
    }

    #[test]
    fn out_of_range_events_fail_fast_and_change_nothing() {
        let mut app = app_with(&[("Dune", "Herbert"), ("Hyperion", "Simmons")]);
        let before: Vec<Book> = app.books().to_vec();

        let err = app.open_edit(5).unwrap_err();
        assert_eq!(err, StoreError::OutOfRange { index: 5, len: 2 });
        assert!(matches!(app.mode(), Mode::Normal));

        assert!(app.open_delete(2).is_err());
        assert!(app.view_details(99).is_err());
        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.books(), before.as_slice());
    }

    #[test]
    fn empty_fields_are_accepted_as_a_record() {
        let mut app = app_with(&[]);
        app.open_add();
        app.submit_form().unwrap();
        assert_eq!(app.books(), &[Book::new("", "")]);
    }

    #[test]
    fn add_then_delete_roundtrip() {
        let mut app = app_with(&[]);

        app.open_add();
        type_into_form(&mut app, "Dune", "Herbert");
        app.submit_form().unwrap();
        assert_eq!(app.books(), &[Book::new("Dune", "Herbert")]);

        app.open_delete(0).unwrap();
        app.confirm_delete().unwrap();
        assert!(app.books().is_empty());
    }

    #[test]
    fn reopening_a_dialog_never_observes_leftover_state() {
        let mut app = app_with(&[("Dune", "Herbert")]);

        app.open_edit(0).unwrap();
        app.cancel();
        assert!(app.form().is_none());
        assert!(app.edit_target().is_none());

        app.open_add();
        let form = app.form().expect("add dialog is open");
        assert!(form.title.is_empty());
        assert!(form.author.is_empty());
        assert_eq!(app.edit_target(), Some(EditTarget::New));
        app.cancel();

        app.open_delete(0).unwrap();
        app.cancel_delete();
        assert!(app.delete_candidate().is_none());

        app.view_details(0).unwrap();
        app.close_details();
        assert!(app.view_target().is_none());
    }

    #[test]
    fn details_view_holds_a_snapshot_of_the_record() {
        let mut app = app_with(&[("Dune", "Herbert")]);
        app.view_details(0).unwrap();
        assert_eq!(app.view_target(), Some(&Book::new("Dune", "Herbert")));
        app.close_details();
        assert!(matches!(app.mode(), Mode::Normal));
    }

    #[test]
    fn events_outside_their_dialog_are_ignored() {
        let mut app = app_with(&[("Dune", "Herbert")]);

        // Nothing is open, so none of these should do anything.
        app.submit_form().unwrap();
        app.cancel();
        app.confirm_delete().unwrap();
        app.cancel_delete();
        app.close_details();

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.books(), &[Book::new("Dune", "Herbert")]);

        // Confirming a delete while the details view is up must not mutate.
        app.view_details(0).unwrap();
        app.confirm_delete().unwrap();
        assert!(matches!(app.mode(), Mode::ViewDetails(_)));
        assert_eq!(app.books().len(), 1);
    }

    #[test]
    fn selection_is_clamped_after_deleting_the_last_row() {
        let mut app = app_with(&[("A", "X"), ("B", "Y"), ("C", "Z")]);
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.selected(), 2);

        app.open_delete(2).unwrap();
        app.confirm_delete().unwrap();
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn key_driven_add_flow() {
        let mut app = app_with(&[]);
        app.handle_key(KeyCode::Char('+')).unwrap();
        assert!(matches!(app.mode(), Mode::AddEdit { .. }));

        type_into_form(&mut app, "Dune", "Herbert");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode(), Mode::Normal));
        assert_eq!(app.books(), &[Book::new("Dune", "Herbert")]);
    }

    #[test]
    fn key_driven_delete_confirmation() {
        let mut app = app_with(&[("Dune", "Herbert")]);
        app.handle_key(KeyCode::Char('-')).unwrap();
        assert!(matches!(app.mode(), Mode::ConfirmDelete(_)));

        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.books().len(), 1);

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.books().is_empty());
    }

    #[test]
    fn quit_only_from_the_list() {
        let mut app = app_with(&[("Dune", "Herbert")]);
        app.open_add();
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
        app.cancel();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
