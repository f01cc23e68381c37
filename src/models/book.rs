//! Book model and request/response payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::validation::{self, FieldReader, MSG_BLANK, MSG_DATE_FORMAT, MSG_REQUIRED};
use crate::error::FieldErrors;

/// Persisted book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// System-assigned identifier, never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    #[schema(example = "2023-01-01")]
    pub published_date: Option<NaiveDate>,
    /// 13-digit ISBN, unique across the catalog
    #[schema(example = "9781593278281")]
    pub isbn: String,
    pub pages: Option<i32>,
    /// Cover image URL
    pub cover: Option<String>,
    pub language: String,
}

/// Validated field values ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub published_date: Option<NaiveDate>,
    pub isbn: String,
    pub pages: Option<i32>,
    pub cover: Option<String>,
    pub language: String,
}

impl NewBook {
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            isbn: self.isbn,
            pages: self.pages,
            cover: self.cover,
            language: self.language,
        }
    }
}

/// Create / full update request.
///
/// Every field is optional at the wire level and a value of the wrong JSON
/// type is kept as a field error, so that all problems can be reported in a
/// single response; [`BookPayload::into_new_book`] enforces which fields are
/// required.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(from = "Map<String, Value>")]
pub struct BookPayload {
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub author: Option<String>,
    /// `YYYY-MM-DD`
    #[schema(example = "2023-01-01")]
    pub published_date: Option<String>,
    #[schema(example = "9781593278281")]
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    pub cover: Option<String>,
    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub language: Option<String>,
    /// Fields whose JSON value had the wrong type
    #[serde(skip)]
    pub malformed: FieldErrors,
}

impl From<Map<String, Value>> for BookPayload {
    fn from(fields: Map<String, Value>) -> Self {
        let mut reader = FieldReader::new(fields);
        Self {
            title: reader.string("title"),
            author: reader.string("author"),
            published_date: reader.string("published_date"),
            isbn: reader.string("isbn"),
            pages: reader.integer("pages"),
            cover: reader.string("cover"),
            language: reader.string("language"),
            malformed: reader.finish(),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

/// Record a required-field failure; yields the value only when usable
fn require(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        // Already reported as malformed
        None if errors.contains(field) => None,
        None => {
            errors.add(field, MSG_REQUIRED);
            None
        }
        Some(v) if v.is_empty() => {
            errors.add(field, MSG_BLANK);
            None
        }
        Some(v) => Some(v),
    }
}

impl BookPayload {
    /// Trim string fields; an empty cover means no cover
    fn normalized(self) -> Self {
        Self {
            title: trimmed(self.title),
            author: trimmed(self.author),
            published_date: trimmed(self.published_date),
            isbn: trimmed(self.isbn),
            pages: self.pages,
            cover: trimmed(self.cover).filter(|c| !c.is_empty()),
            language: trimmed(self.language),
            malformed: self.malformed,
        }
    }

    /// Run every field check and collect all failures before giving up.
    pub fn into_new_book(self) -> Result<NewBook, FieldErrors> {
        let mut payload = self.normalized();
        let mut errors = std::mem::take(&mut payload.malformed);

        if let Err(e) = payload.validate() {
            errors.extend_from(&e);
        }

        if let Some(isbn) = payload.isbn.as_deref().filter(|i| !i.is_empty()) {
            if let Err(e) = validation::validate_isbn(isbn) {
                errors.add("isbn", e.message.unwrap_or_default());
            }
        }

        let published_date = match payload.published_date.as_deref() {
            None => None,
            Some(raw) => {
                let parsed = validation::parse_date(raw);
                if parsed.is_none() {
                    errors.add("published_date", MSG_DATE_FORMAT);
                }
                parsed
            }
        };

        let title = require(&mut errors, "title", payload.title);
        let author = require(&mut errors, "author", payload.author);
        let isbn = require(&mut errors, "isbn", payload.isbn);
        let language = require(&mut errors, "language", payload.language);

        match (title, author, isbn, language) {
            (Some(title), Some(author), Some(isbn), Some(language)) if errors.is_empty() => {
                Ok(NewBook {
                    title,
                    author,
                    published_date,
                    isbn,
                    pages: payload.pages,
                    cover: payload.cover,
                    language,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Partial update request.
///
/// Omitted fields keep their stored value. Optional fields can be cleared
/// with an explicit `null`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(from = "Map<String, Value>")]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    #[schema(value_type = Option<String>, example = "2023-01-01")]
    pub published_date: Option<Option<String>>,
    pub isbn: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub pages: Option<Option<i32>>,
    #[schema(value_type = Option<String>)]
    pub cover: Option<Option<String>>,
    pub language: Option<String>,
    #[serde(skip)]
    pub malformed: FieldErrors,
}

impl From<Map<String, Value>> for BookPatch {
    fn from(fields: Map<String, Value>) -> Self {
        let mut reader = FieldReader::new(fields);
        Self {
            title: reader.string("title"),
            author: reader.string("author"),
            published_date: reader.nullable_string("published_date"),
            isbn: reader.string("isbn"),
            pages: reader.nullable_integer("pages"),
            cover: reader.nullable_string("cover"),
            language: reader.string("language"),
            malformed: reader.finish(),
        }
    }
}

impl BookPatch {
    /// Overlay the patch on an existing record, yielding a full payload
    pub fn apply_to(self, book: &Book) -> BookPayload {
        BookPayload {
            title: Some(self.title.unwrap_or_else(|| book.title.clone())),
            author: Some(self.author.unwrap_or_else(|| book.author.clone())),
            published_date: self.published_date.unwrap_or_else(|| {
                book.published_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
            }),
            isbn: Some(self.isbn.unwrap_or_else(|| book.isbn.clone())),
            pages: self.pages.unwrap_or(book.pages),
            cover: self.cover.unwrap_or_else(|| book.cover.clone()),
            language: Some(self.language.unwrap_or_else(|| book.language.clone())),
            malformed: self.malformed,
        }
    }
}

/// Book list query parameters. Unknown parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact author match
    pub author: Option<String>,
    /// Exact publication date (`YYYY-MM-DD`)
    pub published_date: Option<String>,
    /// Published on or after (`YYYY-MM-DD`)
    #[serde(rename = "published_date__gte")]
    pub published_date_gte: Option<String>,
    /// Published on or before (`YYYY-MM-DD`)
    #[serde(rename = "published_date__lte")]
    pub published_date_lte: Option<String>,
    /// Exact language match
    pub language: Option<String>,
    /// Page number, starting at 1
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
    /// Override the default page size
    #[param(value_type = Option<i64>)]
    pub page_size: Option<String>,
}

/// One page of books
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookPage {
    /// Number of books matching the filters, across all pages
    pub count: i64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    pub results: Vec<Book>,
}
