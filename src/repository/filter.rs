//! Book list filters.
//!
//! A [`BookFilter`] is a conjunction of optional conditions. It renders either
//! as a predicate over in-memory records or as a bound SQL `WHERE` clause.

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    error::FieldErrors,
    models::{book::BookQuery, validation, Book},
};

const MSG_INVALID_DATE: &str = "Enter a valid date.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub author: Option<String>,
    pub language: Option<String>,
    pub published_date: Option<NaiveDate>,
    pub published_after: Option<NaiveDate>,
    pub published_before: Option<NaiveDate>,
}

/// Empty query values mean "no filter"
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn date_param(
    errors: &mut FieldErrors,
    field: &str,
    value: &Option<String>,
) -> Option<NaiveDate> {
    let raw = non_empty(value)?;
    let parsed = validation::parse_date(raw);
    if parsed.is_none() {
        errors.add(field, MSG_INVALID_DATE);
    }
    parsed
}

impl BookFilter {
    pub fn from_query(query: &BookQuery) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let filter = Self {
            author: non_empty(&query.author).map(str::to_string),
            language: non_empty(&query.language).map(str::to_string),
            published_date: date_param(&mut errors, "published_date", &query.published_date),
            published_after: date_param(&mut errors, "published_date__gte", &query.published_date_gte),
            published_before: date_param(&mut errors, "published_date__lte", &query.published_date_lte),
        };

        errors.into_result()?;
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the record passes every condition
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(author) = &self.author {
            if &book.author != author {
                return false;
            }
        }
        if let Some(language) = &self.language {
            if &book.language != language {
                return false;
            }
        }
        if let Some(date) = self.published_date {
            if book.published_date != Some(date) {
                return false;
            }
        }
        if let Some(after) = self.published_after {
            if !book.published_date.is_some_and(|d| d >= after) {
                return false;
            }
        }
        if let Some(before) = self.published_before {
            if !book.published_date.is_some_and(|d| d <= before) {
                return false;
            }
        }
        true
    }

    /// Append ` WHERE ...` (nothing when the filter is empty)
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        let mut separator = " WHERE ";

        if let Some(author) = &self.author {
            builder.push(separator).push("author = ").push_bind(author.clone());
            separator = " AND ";
        }
        if let Some(language) = &self.language {
            builder.push(separator).push("language = ").push_bind(language.clone());
            separator = " AND ";
        }
        if let Some(date) = self.published_date {
            builder.push(separator).push("published_date = ").push_bind(date);
            separator = " AND ";
        }
        if let Some(after) = self.published_after {
            builder.push(separator).push("published_date >= ").push_bind(after);
            separator = " AND ";
        }
        if let Some(before) = self.published_before {
            builder.push(separator).push("published_date <= ").push_bind(before);
        }
    }
}
