//! Book endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};

use crate::{
    error::AppResult,
    models::{Book, BookPage, BookPatch, BookPayload, BookQuery},
};

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "One page of books, ordered by id", body = BookPage),
        (status = 400, description = "Invalid filter value or page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    uri: Uri,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> AppResult<Json<BookPage>> {
    let Query(query) = query?;

    let page = state.services.books.list(&query).await?;

    Ok(Json(BookPage {
        count: page.count,
        next: page.next_link(uri.path(), uri.query()),
        previous: page.previous_link(uri.path(), uri.query()),
        results: page.items,
    }))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Book>> {
    let Path(id) = id?;
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Field errors, keyed by field name")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let Json(payload) = payload?;
    let created = state.services.books.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let updated = state.services.books.update(id, payload).await?;
    Ok(Json(updated))
}

/// Update some fields of a book
#[utoipa::path(
    patch,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Field errors, keyed by field name"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn partial_update_book(
    State(state): State<crate::AppState>,
    id: Result<Path<i64>, PathRejection>,
    patch: Result<Json<BookPatch>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let Path(id) = id?;
    let Json(patch) = patch?;
    let updated = state.services.books.partial_update(id, patch).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}/",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
