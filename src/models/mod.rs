//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, CreateAuthor, UpdateAuthor};
pub use book::{Book, BookFilter, CreateBook, UpdateBook};
pub use genre::{CreateGenre, Genre, UpdateGenre};

/// Catalog entity types, used to build user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Genre,
    Author,
    Book,
}

impl EntityKind {
    /// Capitalized name ("Genre")
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Genre => "Genre",
            EntityKind::Author => "Author",
            EntityKind::Book => "Book",
        }
    }

    /// Name with its indefinite article ("a genre", "An author")
    pub fn indefinite(self, capitalized: bool) -> String {
        let noun = self.label().to_lowercase();
        let article = match (noun.starts_with(['a', 'e', 'i', 'o', 'u']), capitalized) {
            (true, true) => "An",
            (true, false) => "an",
            (false, true) => "A",
            (false, false) => "a",
        };
        format!("{} {}", article, noun)
    }
}
