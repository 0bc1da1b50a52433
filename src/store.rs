//! In-memory collection store. The library owns the ordered sequence of
//! books; a book's position in that sequence is its only identity, so the
//! positions are contiguous, zero-based, and re-index on removal. Nothing
//! here touches the interaction state: the UI layer alone is responsible
//! for invalidating any index it was holding after a mutation.

use thiserror::Error;

use crate::models::Book;

/// The single failure mode of the store. Index-based operations receive
/// their positions from currently rendered rows, so an out-of-range index
/// means the caller is out of sync with the collection and the fault is
/// surfaced instead of swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("position {index} is out of range (library holds {len} books)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered collection of books. Unbounded; append never fails.
#[derive(Debug, Default)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a library from existing books, preserving their order.
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Insert at the end of the sequence.
    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    /// Overwrite the book at `index`, leaving every other position and the
    /// overall order untouched.
    pub fn replace_at(&mut self, index: usize, book: Book) -> Result<(), StoreError> {
        let slot = self.slot(index)?;
        self.books[slot] = book;
        Ok(())
    }

    /// Remove the book at `index`; every later position shifts down by one.
    /// Returns the removed book.
    pub fn remove_at(&mut self, index: usize) -> Result<Book, StoreError> {
        let slot = self.slot(index)?;
        Ok(self.books.remove(slot))
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Read-only view of the full sequence, used by rendering and tests.
    pub fn snapshot(&self) -> &[Book] {
        &self.books
    }

    fn slot(&self, index: usize) -> Result<usize, StoreError> {
        if index < self.books.len() {
            Ok(index)
        } else {
            Err(StoreError::OutOfRange {
                index,
                len: self.books.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Library, StoreError};
    use crate::models::Book;

    fn sample_library() -> Library {
        Library::from_books(vec![
            Book::new("Dune", "Herbert"),
            Book::new("Hyperion", "Simmons"),
            Book::new("Solaris", "Lem"),
        ])
    }

    #[test]
    fn append_extends_the_tail() {
        let mut library = Library::new();
        library.append(Book::new("Dune", "Herbert"));
        library.append(Book::new("Hyperion", "Simmons"));
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(1).unwrap().title, "Hyperion");
    }

    #[test]
    fn replace_preserves_other_positions() {
        let mut library = sample_library();
        library
            .replace_at(1, Book::new("Ubik", "Dick"))
            .expect("index 1 is valid");
        assert_eq!(library.get(0).unwrap().title, "Dune");
        assert_eq!(library.get(1).unwrap().title, "Ubik");
        assert_eq!(library.get(2).unwrap().title, "Solaris");
    }

    #[test]
    fn remove_shifts_later_positions_down() {
        let mut library = sample_library();
        let removed = library.remove_at(1).expect("index 1 is valid");
        assert_eq!(removed.title, "Hyperion");
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(1).unwrap().title, "Solaris");
    }

    #[test]
    fn out_of_range_operations_report_the_index() {
        let mut library = sample_library();
        assert_eq!(
            library.replace_at(3, Book::new("", "")),
            Err(StoreError::OutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            library.remove_at(7).unwrap_err(),
            StoreError::OutOfRange { index: 7, len: 3 }
        );
        assert_eq!(library.len(), 3);
    }

    #[test]
    fn reads_never_mutate() {
        let library = sample_library();
        let before: Vec<Book> = library.snapshot().to_vec();
        let _ = library.get(0);
        let _ = library.get(99);
        assert_eq!(library.snapshot(), before.as_slice());
    }
}
