//! In-process catalog store.
//!
//! Mirrors the constraints of the PostgreSQL schema (unique names,
//! restrictive foreign keys) so it can stand in for the database in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{AuthorStore, BookStore, CatalogStore, GenreStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, BookFilter, EntityKind, Genre},
};

#[derive(Debug, Clone)]
struct BookRow {
    title: String,
    genre_id: i32,
    author_id: i32,
}

/// Identity column: ids are never reused, even after deletes
#[derive(Debug)]
struct Table<R> {
    rows: BTreeMap<i32, R>,
    last_id: i32,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<R> Table<R> {
    fn insert(&mut self, row: R) -> i32 {
        self.last_id += 1;
        self.rows.insert(self.last_id, row);
        self.last_id
    }
}

impl Table<String> {
    fn name_taken(&self, name: &str, exclude_id: Option<i32>) -> bool {
        self.rows
            .iter()
            .any(|(id, existing)| existing == name && Some(*id) != exclude_id)
    }
}

#[derive(Debug, Default)]
struct Tables {
    genres: Table<String>,
    authors: Table<String>,
    books: Table<BookRow>,
}

impl Tables {
    fn book(&self, id: i32, row: &BookRow) -> Book {
        Book {
            id,
            title: row.title.clone(),
            genre_id: row.genre_id,
            author_id: row.author_id,
            genre_name: self.genres.rows.get(&row.genre_id).cloned().unwrap_or_default(),
            author_name: self.authors.rows.get(&row.author_id).cloned().unwrap_or_default(),
        }
    }

    fn check_references(&self, genre_id: i32, author_id: i32) -> AppResult<()> {
        if !self.genres.rows.contains_key(&genre_id) {
            return Err(AppError::dangling_reference(EntityKind::Genre));
        }
        if !self.authors.rows.contains_key(&author_id) {
            return Err(AppError::dangling_reference(EntityKind::Author));
        }
        Ok(())
    }
}

/// Catalog store kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GenreStore for MemoryStore {
    async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables
            .genres
            .rows
            .iter()
            .map(|(id, name)| Genre { id: *id, name: name.clone() })
            .collect())
    }

    async fn genres_get(&self, id: i32) -> AppResult<Option<Genre>> {
        let tables = self.tables.read().await;
        Ok(tables
            .genres
            .rows
            .get(&id)
            .map(|name| Genre { id, name: name.clone() }))
    }

    async fn genres_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self.tables.read().await.genres.name_taken(name, exclude_id))
    }

    async fn genres_create(&self, name: &str) -> AppResult<Genre> {
        let mut tables = self.tables.write().await;
        if tables.genres.name_taken(name, None) {
            return Err(AppError::duplicate_name(EntityKind::Genre));
        }
        let id = tables.genres.insert(name.to_string());
        Ok(Genre { id, name: name.to_string() })
    }

    async fn genres_update(&self, id: i32, name: &str) -> AppResult<Option<Genre>> {
        let mut tables = self.tables.write().await;
        if !tables.genres.rows.contains_key(&id) {
            return Ok(None);
        }
        if tables.genres.name_taken(name, Some(id)) {
            return Err(AppError::duplicate_name(EntityKind::Genre));
        }
        tables.genres.rows.insert(id, name.to_string());
        Ok(Some(Genre { id, name: name.to_string() }))
    }

    async fn genres_delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.genres.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.books.rows.values().any(|book| book.genre_id == id) {
            return Err(AppError::still_referenced(EntityKind::Genre));
        }
        tables.genres.rows.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(tables
            .authors
            .rows
            .iter()
            .map(|(id, name)| Author { id: *id, name: name.clone() })
            .collect())
    }

    async fn authors_get(&self, id: i32) -> AppResult<Option<Author>> {
        let tables = self.tables.read().await;
        Ok(tables
            .authors
            .rows
            .get(&id)
            .map(|name| Author { id, name: name.clone() }))
    }

    async fn authors_name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self.tables.read().await.authors.name_taken(name, exclude_id))
    }

    async fn authors_create(&self, name: &str) -> AppResult<Author> {
        let mut tables = self.tables.write().await;
        if tables.authors.name_taken(name, None) {
            return Err(AppError::duplicate_name(EntityKind::Author));
        }
        let id = tables.authors.insert(name.to_string());
        Ok(Author { id, name: name.to_string() })
    }

    async fn authors_update(&self, id: i32, name: &str) -> AppResult<Option<Author>> {
        let mut tables = self.tables.write().await;
        if !tables.authors.rows.contains_key(&id) {
            return Ok(None);
        }
        if tables.authors.name_taken(name, Some(id)) {
            return Err(AppError::duplicate_name(EntityKind::Author));
        }
        tables.authors.rows.insert(id, name.to_string());
        Ok(Some(Author { id, name: name.to_string() }))
    }

    async fn authors_delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.authors.rows.contains_key(&id) {
            return Ok(false);
        }
        if tables.books.rows.values().any(|book| book.author_id == id) {
            return Err(AppError::still_referenced(EntityKind::Author));
        }
        tables.authors.rows.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn books_list(&self, filter: BookFilter) -> AppResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables
            .books
            .rows
            .iter()
            .filter(|(_, row)| filter.matches(row.genre_id, row.author_id))
            .map(|(id, row)| tables.book(*id, row))
            .collect())
    }

    async fn books_get(&self, id: i32) -> AppResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.rows.get(&id).map(|row| tables.book(id, row)))
    }

    async fn books_create(&self, title: &str, genre_id: i32, author_id: i32) -> AppResult<Book> {
        let mut tables = self.tables.write().await;
        tables.check_references(genre_id, author_id)?;
        let row = BookRow {
            title: title.to_string(),
            genre_id,
            author_id,
        };
        let id = tables.books.insert(row.clone());
        Ok(tables.book(id, &row))
    }

    async fn books_update(
        &self,
        id: i32,
        title: &str,
        genre_id: i32,
        author_id: i32,
    ) -> AppResult<Option<Book>> {
        let mut tables = self.tables.write().await;
        if !tables.books.rows.contains_key(&id) {
            return Ok(None);
        }
        tables.check_references(genre_id, author_id)?;
        let row = BookRow {
            title: title.to_string(),
            genre_id,
            author_id,
        };
        tables.books.rows.insert(id, row.clone());
        Ok(Some(tables.book(id, &row)))
    }

    async fn books_delete(&self, id: i32) -> AppResult<bool> {
        Ok(self.tables.write().await.books.rows.remove(&id).is_some())
    }

    async fn books_count_by_genre(&self, genre_id: i32) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.books.rows.values().filter(|b| b.genre_id == genre_id).count() as i64)
    }

    async fn books_count_by_author(&self, author_id: i32) -> AppResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.books.rows.values().filter(|b| b.author_id == author_id).count() as i64)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
