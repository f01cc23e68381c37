//! Repository layer for book storage

pub mod books;
pub mod filter;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, NewBook, PageRequest, Paginated},
};

pub use filter::BookFilter;

/// Storage operations for book records.
///
/// Implementations assign ids from a monotonically increasing sequence and
/// refuse a second record with an ISBN that is already stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books matching `filter`, ordered by id, sliced to `page`
    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Paginated<Book>>;

    async fn get_by_id(&self, id: i64) -> AppResult<Book>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    async fn create(&self, book: &NewBook) -> AppResult<Book>;

    /// Replace every field of an existing record
    async fn update(&self, id: i64, book: &NewBook) -> AppResult<Book>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the configured store
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// PostgreSQL-backed repository
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::new(Arc::new(books::BooksRepository::new(pool)))
    }

    /// Process-local repository; contents are lost on shutdown
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::InMemoryBooksRepository::new()))
    }
}
