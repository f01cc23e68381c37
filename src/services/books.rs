//! Book catalog service

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{Book, BookPatch, BookPayload, BookQuery, NewBook, PageRequest, Paginated},
    repository::{BookFilter, Repository},
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl BookService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    /// Filtered, id-ordered page of books
    pub async fn list(&self, query: &BookQuery) -> AppResult<Paginated<Book>> {
        let filter = BookFilter::from_query(query)?;
        let page = PageRequest::resolve(
            query.page.as_deref(),
            query.page_size.as_deref(),
            &self.pagination,
        )?;
        self.repository.books.list(&filter, page).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let book = payload.into_new_book()?;
        self.ensure_isbn_available(&book, None).await?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, "Created book");
        Ok(created)
    }

    /// Full replacement: every required field must be supplied again
    pub async fn update(&self, id: i64, payload: BookPayload) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        self.replace(id, payload).await
    }

    /// Merge the supplied fields over the stored record, then validate as a full update
    pub async fn partial_update(&self, id: i64, patch: BookPatch) -> AppResult<Book> {
        let existing = self.repository.books.get_by_id(id).await?;
        self.replace(id, patch.apply_to(&existing)).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(book_id = id, "Deleted book");
        Ok(())
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }

    async fn replace(&self, id: i64, payload: BookPayload) -> AppResult<Book> {
        let book = payload.into_new_book()?;
        self.ensure_isbn_available(&book, Some(id)).await?;

        let updated = self.repository.books.update(id, &book).await?;
        tracing::info!(book_id = id, "Updated book");
        Ok(updated)
    }

    async fn ensure_isbn_available(&self, book: &NewBook, owner: Option<i64>) -> AppResult<()> {
        match self.repository.books.find_by_isbn(&book.isbn).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::duplicate_isbn()),
            _ => Ok(()),
        }
    }
}
