//! PostgreSQL book repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use super::{BookFilter, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook, PageRequest, Paginated},
};

const BOOK_COLUMNS: &str = "id, title, author, published_date, isbn, pages, cover, language";

/// Map a unique-constraint race on `isbn` to the same error the pre-check gives
fn map_write_error(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::duplicate_isbn(),
        _ => AppError::Database(error),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self, filter: &BookFilter, page: PageRequest) -> AppResult<Paginated<Book>> {
        // Count and page read one snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        filter.push_where(&mut count_query);
        let count: i64 = count_query.build_query_scalar().fetch_one(&mut *tx).await?;

        let mut select_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", BOOK_COLUMNS));
        filter.push_where(&mut select_query);
        select_query
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = select_query
            .build_query_as::<Book>()
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Paginated {
            items,
            count,
            request: page,
        })
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::book_not_found(id))
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book =
            sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE isbn = $1", BOOK_COLUMNS))
                .bind(isbn)
                .fetch_optional(&self.pool)
                .await?;
        Ok(book)
    }

    async fn create(&self, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, published_date, isbn, pages, cover, language)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.published_date)
        .bind(&book.isbn)
        .bind(book.pages)
        .bind(&book.cover)
        .bind(&book.language)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: i64, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, published_date = $3, isbn = $4,
                pages = $5, cover = $6, language = $7
            WHERE id = $8
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.published_date)
        .bind(&book.isbn)
        .bind(book.pages)
        .bind(&book.cover)
        .bind(&book.language)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::book_not_found(id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::book_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
