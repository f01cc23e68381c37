//! In-process book store

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookFilter, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{pagination, Book, NewBook, PageRequest, Paginated},
};

#[derive(Debug)]
struct State {
    last_id: i64,
    books: BTreeMap<i64, Book>,
}

impl State {
    fn isbn_taken(&self, isbn: &str, except_id: Option<i64>) -> bool {
        self.books
            .values()
            .any(|b| b.isbn == isbn && Some(b.id) != except_id)
    }
}

/// Books kept in a `BTreeMap` keyed by id, so iteration is already id-ordered.
///
/// Ids come from a counter that only moves forward; deleted ids are never
/// handed out again.
#[derive(Debug)]
pub struct InMemoryBooksRepository {
    state: RwLock<State>,
}

impl InMemoryBooksRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                last_id: 0,
                books: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryBooksRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for InMemoryBooksRepository {
    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Paginated<Book>> {
        let state = self.state.read().await;
        let matching: Vec<Book> = state
            .books
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        Ok(pagination::paginate(matching, page))
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.state
            .read()
            .await
            .books
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::book_not_found(id))
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let state = self.state.read().await;
        Ok(state.books.values().find(|b| b.isbn == isbn).cloned())
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if state.isbn_taken(&book.isbn, None) {
            return Err(AppError::duplicate_isbn());
        }

        state.last_id += 1;
        let created = book.clone().into_book(state.last_id);
        state.books.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, book: &NewBook) -> AppResult<Book> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Err(AppError::book_not_found(id));
        }
        if state.isbn_taken(&book.isbn, Some(id)) {
            return Err(AppError::duplicate_isbn());
        }

        let updated = book.clone().into_book(id);
        state.books.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.state
            .write()
            .await
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::book_not_found(id))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
